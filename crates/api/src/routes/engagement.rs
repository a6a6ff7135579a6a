//! Announcement and survey routes.

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

use super::buildings::require_building_manager;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};
use domus_core::engagement::Audience;
use domus_db::EngagementRepository;

/// Creates the announcements and surveys router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/buildings/{id}/announcements",
            get(list_announcements).post(create_announcement),
        )
        .route("/announcements/{id}/deactivate", post(deactivate_announcement))
        .route(
            "/buildings/{id}/surveys",
            get(list_surveys).post(create_survey),
        )
        .route("/surveys/{id}/close", post(close_survey))
        .route(
            "/surveys/{id}/responses",
            get(list_responses).post(respond),
        )
}

/// Request body for an announcement.
#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// all, residents, managers or businesses; all when omitted.
    pub target_audience: Option<String>,
}

/// Request body for a survey.
#[derive(Debug, Deserialize)]
pub struct CreateSurveyRequest {
    /// Survey title.
    pub title: String,
    /// What is being asked.
    #[serde(default)]
    pub description: String,
}

/// Request body for a survey answer.
#[derive(Debug, Deserialize)]
pub struct SurveyResponseRequest {
    /// Free-text answer.
    pub response: String,
}

async fn create_announcement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> ApiResult<impl IntoResponse> {
    require_building_manager(&state, &auth, building_id).await?;

    let audience = match payload.target_audience.as_deref() {
        None => Audience::default(),
        Some(raw) => raw
            .parse::<Audience>()
            .map_err(|e| ApiError::bad_request("invalid_audience", e.to_string()))?,
    };

    let announcement = EngagementRepository::new(state.conn())
        .announce(building_id, &payload.title, &payload.content, audience)
        .await?;

    info!(building_id, announcement_id = announcement.id, "Announcement published");
    Ok((StatusCode::CREATED, Json(announcement)))
}

/// Active announcements whose audience reaches the caller's role.
async fn list_announcements(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let announcements = EngagementRepository::new(state.conn())
        .list_announcements_for(building_id, auth.role())
        .await?;
    Ok(Json(json!({ "announcements": announcements })))
}

async fn deactivate_announcement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = EngagementRepository::new(state.conn());
    let announcement = repo
        .find_announcement(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Announcement not found: {id}")))?;
    require_building_manager(&state, &auth, announcement.building_id).await?;

    Ok(Json(repo.deactivate_announcement(id).await?))
}

async fn create_survey(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
    Json(payload): Json<CreateSurveyRequest>,
) -> ApiResult<impl IntoResponse> {
    require_building_manager(&state, &auth, building_id).await?;

    let survey = EngagementRepository::new(state.conn())
        .create_survey(building_id, &payload.title, &payload.description)
        .await?;
    Ok((StatusCode::CREATED, Json(survey)))
}

async fn list_surveys(
    State(state): State<AppState>,
    Path(building_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let surveys = EngagementRepository::new(state.conn())
        .list_active_surveys(building_id)
        .await?;
    Ok(Json(json!({ "surveys": surveys })))
}

async fn close_survey(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = EngagementRepository::new(state.conn());
    let survey = repo
        .find_survey(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Survey not found: {id}")))?;
    require_building_manager(&state, &auth, survey.building_id).await?;

    Ok(Json(repo.close_survey(id).await?))
}

async fn respond(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<SurveyResponseRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = EngagementRepository::new(state.conn())
        .respond(id, auth.user_id(), &payload.response)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Responses are visible to the building's manager only.
async fn list_responses(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let repo = EngagementRepository::new(state.conn());
    let survey = repo
        .find_survey(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Survey not found: {id}")))?;
    require_building_manager(&state, &auth, survey.building_id).await?;

    let responses = repo.list_responses(id).await?;
    Ok(Json(json!({ "responses": responses })))
}
