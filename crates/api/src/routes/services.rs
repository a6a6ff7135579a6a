//! Service catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::parse_amount;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};
use domus_core::catalog::{RequestStatus, ServiceDefinition};
use domus_db::ServiceRepository;

/// Creates the service catalog router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services).post(define_service))
        .route("/services/{id}/activate", post(activate_service))
        .route("/services/{id}/requests", post(request_service))
        .route("/service-requests", get(list_my_requests))
        .route("/service-requests/{id}/status", put(update_request_status))
}

/// Request body for defining a service.
#[derive(Debug, Deserialize)]
pub struct DefineServiceRequest {
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Price as a decimal string.
    pub cost: String,
    /// Start of availability.
    pub available_from: DateTime<Utc>,
    /// End of availability.
    pub available_to: DateTime<Utc>,
    /// Manager profile the service is offered through.
    pub building_manager_id: i64,
}

/// Query for listing services.
#[derive(Debug, Deserialize)]
pub struct ListServicesQuery {
    /// Restrict to one building.
    pub building_id: Option<i64>,
}

/// Request body for requesting a service.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceRequestBody {
    /// Notes for the provider.
    pub additional_info: Option<String>,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: String,
}

/// POST /services - Define a service (verified business owner).
async fn define_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<DefineServiceRequest>,
) -> ApiResult<impl IntoResponse> {
    let cost = parse_amount(&payload.cost)?;
    let definition = ServiceDefinition {
        name: payload.name,
        description: payload.description,
        cost: cost.amount(),
        available_from: payload.available_from,
        available_to: payload.available_to,
    };

    let service = ServiceRepository::new(state.conn())
        .define(auth.user_id(), payload.building_manager_id, &definition)
        .await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// POST /services/{id}/activate - Activate (named building manager only).
async fn activate_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let service = ServiceRepository::new(state.conn())
        .activate(id, auth.user_id())
        .await?;
    Ok(Json(service))
}

/// GET /services?building_id= - Active services.
async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ListServicesQuery>,
) -> ApiResult<impl IntoResponse> {
    let services = ServiceRepository::new(state.conn())
        .list_active(query.building_id)
        .await?;
    Ok(Json(json!({ "services": services })))
}

/// POST /services/{id}/requests - Request an active service.
async fn request_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<ServiceRequestBody>,
) -> ApiResult<impl IntoResponse> {
    let request = ServiceRepository::new(state.conn())
        .request(auth.user_id(), id, payload.additional_info)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /service-requests - The caller's requests.
async fn list_my_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let requests = ServiceRepository::new(state.conn())
        .list_requests_for_user(auth.user_id())
        .await?;
    Ok(Json(json!({ "requests": requests })))
}

/// PUT /service-requests/{id}/status
async fn update_request_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let status = payload
        .status
        .parse::<RequestStatus>()
        .map_err(|e| ApiError::bad_request("invalid_status", e.to_string()))?;

    let request = ServiceRepository::new(state.conn())
        .update_request_status(id, auth.user_id(), status)
        .await?;
    Ok(Json(request))
}
