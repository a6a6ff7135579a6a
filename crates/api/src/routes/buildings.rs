//! Building registry routes: buildings, role profiles, transfers and contracts.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};
use domus_core::{auth::AccountRole, profile::ResidentType};
use domus_db::BuildingRepository;

/// Creates the building registry router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/buildings", get(list_buildings).post(create_building))
        .route("/buildings/{id}", get(get_building))
        .route("/buildings/{id}/manager", post(register_manager))
        .route("/managers/{id}/verify", post(verify_manager))
        .route(
            "/buildings/{id}/residents",
            get(list_residents).post(add_resident),
        )
        .route("/business-profile", post(create_business_profile))
        .route("/business-owners/{id}/verify", post(verify_business_owner))
        .route("/buildings/{id}/transfer-requests", post(request_transfer))
        .route("/transfer-requests/{id}/approve", post(approve_transfer))
        .route("/contracts", post(create_contract))
        .route("/contracts/{id}/approve", post(approve_contract))
}

/// Fails with 403 unless the caller manages `building_id`.
pub(crate) async fn require_building_manager(
    state: &AppState,
    auth: &AuthUser,
    building_id: i64,
) -> ApiResult<()> {
    if BuildingRepository::new(state.conn())
        .is_manager_of(auth.user_id(), building_id)
        .await?
    {
        Ok(())
    } else {
        Err(ApiError::forbidden("Only the building's manager can do this"))
    }
}

/// Request body for creating a building.
#[derive(Debug, Deserialize)]
pub struct CreateBuildingRequest {
    /// Building name.
    pub name: String,
    /// Street address.
    pub address: String,
}

/// Request body naming a user.
#[derive(Debug, Deserialize)]
pub struct UserRef {
    /// Target user.
    pub user_id: i64,
}

/// Request body for adding a resident.
#[derive(Debug, Deserialize)]
pub struct AddResidentRequest {
    /// Resident account.
    pub user_id: i64,
    /// owner, tenant or visitor; tenant when omitted.
    pub resident_type: Option<String>,
}

/// Request body for a business profile.
#[derive(Debug, Deserialize)]
pub struct BusinessProfileRequest {
    /// Trading name.
    pub business_name: String,
}

/// Request body for a contract.
#[derive(Debug, Deserialize)]
pub struct CreateContractRequest {
    /// Contract terms.
    pub details: String,
}

/// POST /buildings - Create a building (admin).
async fn create_building(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBuildingRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("invalid_name", "Building name is required"));
    }

    let building = BuildingRepository::new(state.conn())
        .create(payload.name.trim(), payload.address.trim())
        .await?;

    info!(building_id = building.id, "Building created");
    Ok((StatusCode::CREATED, Json(building)))
}

/// GET /buildings
async fn list_buildings(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let buildings = BuildingRepository::new(state.conn()).list().await?;
    Ok(Json(json!({ "buildings": buildings })))
}

/// GET /buildings/{id}
async fn get_building(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let building = BuildingRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Building not found: {id}")))?;
    Ok(Json(building))
}

/// POST /buildings/{id}/manager - Assign a manager (admin).
async fn register_manager(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
    Json(payload): Json<UserRef>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;

    let manager = BuildingRepository::new(state.conn())
        .register_manager(building_id, payload.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(manager)))
}

/// POST /managers/{id}/verify (admin)
async fn verify_manager(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    let manager = BuildingRepository::new(state.conn()).verify_manager(id).await?;
    Ok(Json(manager))
}

/// POST /buildings/{id}/residents - Add a resident profile (building manager).
async fn add_resident(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
    Json(payload): Json<AddResidentRequest>,
) -> ApiResult<impl IntoResponse> {
    require_building_manager(&state, &auth, building_id).await?;

    let resident_type = match payload.resident_type.as_deref() {
        None => ResidentType::default(),
        Some(raw) => raw
            .parse::<ResidentType>()
            .map_err(|e| ApiError::bad_request("invalid_resident_type", e.to_string()))?,
    };

    let resident = BuildingRepository::new(state.conn())
        .add_resident(building_id, payload.user_id, resident_type)
        .await?;

    info!(building_id, user_id = payload.user_id, "Resident added");
    Ok((StatusCode::CREATED, Json(resident)))
}

/// GET /buildings/{id}/residents (building manager)
async fn list_residents(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    require_building_manager(&state, &auth, building_id).await?;
    let residents = BuildingRepository::new(state.conn())
        .list_residents(building_id)
        .await?;
    Ok(Json(json!({ "residents": residents })))
}

/// POST /business-profile - Create the caller's business-owner profile.
async fn create_business_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<BusinessProfileRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_role(AccountRole::Business)?;

    let owner = BuildingRepository::new(state.conn())
        .create_business_owner(auth.user_id(), &payload.business_name)
        .await?;
    Ok((StatusCode::CREATED, Json(owner)))
}

/// POST /business-owners/{id}/verify (admin)
async fn verify_business_owner(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    let owner = BuildingRepository::new(state.conn())
        .verify_business_owner(id)
        .await?;
    Ok(Json(owner))
}

/// POST /buildings/{id}/transfer-requests - Ask to take over a building.
async fn request_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    auth.require_role(AccountRole::Manager)?;

    let transfer = BuildingRepository::new(state.conn())
        .request_transfer(building_id, auth.user_id())
        .await?;
    Ok((StatusCode::CREATED, Json(transfer)))
}

/// POST /transfer-requests/{id}/approve (admin)
async fn approve_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    let manager = BuildingRepository::new(state.conn())
        .approve_transfer(id)
        .await?;
    Ok(Json(manager))
}

/// POST /contracts - Record a contract for the caller's manager profile.
async fn create_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateContractRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.details.trim().is_empty() {
        return Err(ApiError::bad_request("invalid_details", "Contract details are required"));
    }
    let repo = BuildingRepository::new(state.conn());
    let manager = repo
        .find_manager_for_user(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::forbidden("Only building managers can record contracts"))?;

    let contract = repo.create_contract(manager.id, payload.details.trim()).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// POST /contracts/{id}/approve (admin)
async fn approve_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    let contract = BuildingRepository::new(state.conn())
        .approve_contract(id)
        .await?;
    Ok(Json(contract))
}
