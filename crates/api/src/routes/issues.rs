//! Issue report routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
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
use domus_core::{auth::AccountRole, engagement::IssueStatus};
use domus_db::IssueRepository;

/// Creates the issue router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/issues", get(list_my_issues).post(report_issue))
        .route("/issues/{id}", put(update_issue))
        .route("/buildings/{id}/issues", get(list_building_issues))
}

/// Request body for reporting an issue.
#[derive(Debug, Deserialize)]
pub struct ReportIssueRequest {
    /// What is wrong.
    pub description: String,
}

/// Request body for updating an issue.
#[derive(Debug, Deserialize)]
pub struct UpdateIssueRequest {
    /// open, in_progress or resolved.
    pub status: Option<String>,
    /// Manager notes.
    pub notes: Option<String>,
}

/// POST /issues - Report an issue as the calling resident.
async fn report_issue(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ReportIssueRequest>,
) -> ApiResult<impl IntoResponse> {
    if !auth.role().can_report_issues() {
        return Err(ApiError::forbidden("Only residents can report issues"));
    }

    let issue = IssueRepository::new(state.conn())
        .report(auth.user_id(), &payload.description)
        .await?;

    info!(issue_id = issue.id, user_id = auth.user_id(), "Issue reported");
    Ok((StatusCode::CREATED, Json(issue)))
}

/// GET /issues - The caller's own reports.
async fn list_my_issues(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let issues = IssueRepository::new(state.conn())
        .list_for_user(auth.user_id())
        .await?;
    Ok(Json(json!({ "issues": issues })))
}

/// GET /buildings/{id}/issues (building manager)
async fn list_building_issues(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    require_building_manager(&state, &auth, building_id).await?;

    let issues = IssueRepository::new(state.conn())
        .list_for_building(building_id)
        .await?;
    Ok(Json(json!({ "issues": issues })))
}

/// PUT /issues/{id} - Update status and notes (building manager).
async fn update_issue(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateIssueRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_role(AccountRole::Manager)?;
    let status = payload
        .status
        .as_deref()
        .map(str::parse::<IssueStatus>)
        .transpose()
        .map_err(|e| ApiError::bad_request("invalid_status", e.to_string()))?;

    let repo = IssueRepository::new(state.conn());
    let (_, building_id) = repo
        .find_with_building(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Issue not found: {id}")))?;
    require_building_manager(&state, &auth, building_id).await?;

    let issue = repo.update(id, status, payload.notes).await?;
    Ok(Json(issue))
}
