//! FAQ routes. Reading is public; editing is for admins.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiResult, middleware::auth::AuthUser};
use domus_db::FaqRepository;

/// Creates the public FAQ router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/faqs", get(list_faqs))
}

/// Creates the admin FAQ router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/faqs", post(create_faq))
        .route("/admin/faqs/{id}", put(update_faq))
}

/// Request body for an FAQ entry.
#[derive(Debug, Deserialize)]
pub struct FaqRequest {
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
}

async fn list_faqs(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let faqs = FaqRepository::new(state.conn()).list().await?;
    Ok(Json(json!({ "faqs": faqs })))
}

async fn create_faq(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<FaqRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    let faq = FaqRepository::new(state.conn())
        .create(&payload.question, &payload.answer)
        .await?;
    Ok((StatusCode::CREATED, Json(faq)))
}

async fn update_faq(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<FaqRequest>,
) -> ApiResult<impl IntoResponse> {
    auth.require_admin()?;
    let faq = FaqRepository::new(state.conn())
        .update(id, &payload.question, &payload.answer)
        .await?;
    Ok(Json(faq))
}
