//! Direct messages, notifications and reminders.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::ApiResult, middleware::auth::AuthUser};
use domus_db::{MessageRepository, NotificationRepository, ReminderRepository};

/// Creates the messaging router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(inbox).post(send_message))
        .route("/messages/{id}/read", post(mark_read))
        .route("/notifications", get(list_notifications))
        .route("/reminders", get(list_reminders).post(create_reminder))
}

/// Request body for a direct message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Recipient.
    pub receiver_id: i64,
    /// Message text.
    pub content: String,
}

/// Request body for a reminder.
#[derive(Debug, Deserialize)]
pub struct CreateReminderRequest {
    /// Reminder text.
    pub message: String,
    /// When it is due.
    pub send_at: DateTime<Utc>,
}

async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let message = MessageRepository::new(state.conn())
        .send(auth.user_id(), payload.receiver_id, &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn inbox(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let messages = MessageRepository::new(state.conn())
        .inbox(auth.user_id())
        .await?;
    Ok(Json(json!({ "messages": messages })))
}

async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let message = MessageRepository::new(state.conn())
        .mark_read(id, auth.user_id())
        .await?;
    Ok(Json(message))
}

async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let notifications = NotificationRepository::new(state.conn())
        .list_for_user(auth.user_id())
        .await?;
    Ok(Json(json!({ "notifications": notifications })))
}

async fn create_reminder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateReminderRequest>,
) -> ApiResult<impl IntoResponse> {
    let reminder = ReminderRepository::new(state.conn())
        .create(auth.user_id(), &payload.message, payload.send_at)
        .await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

async fn list_reminders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let reminders = ReminderRepository::new(state.conn())
        .list_for_user(auth.user_id())
        .await?;
    Ok(Json(json!({ "reminders": reminders })))
}
