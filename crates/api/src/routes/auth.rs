//! Authentication routes for register, login, token refresh and logout.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};
use domus_core::auth::{
    AccountRole, PasswordError, hash_password, is_acceptable_password, verify_password,
};
use domus_db::{SessionRepository, UserRepository, entities::users, repositories::CreateUserInput};
use domus_shared::{
    AppError,
    auth::{
        LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse,
        RegisterRequest, UserInfo,
    },
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Creates the auth routes that need a valid access token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/me", get(me))
}

/// Converts a stored user into the public view.
pub(crate) fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        email: user.email,
        role: AccountRole::from(user.role).to_string(),
        is_admin: user.is_admin,
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::new(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "Invalid username or password",
    )
}

fn token_error(e: &domus_shared::JwtError) -> ApiError {
    AppError::Internal(e.to_string()).into()
}

/// POST /auth/register - Create an account and its wallet.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = payload.username.trim();
    if username.is_empty() || username.chars().count() > 150 {
        return Err(ApiError::bad_request(
            "invalid_username",
            "Username must be between 1 and 150 characters",
        ));
    }
    if !is_acceptable_password(&payload.password) {
        return Err(ApiError::bad_request(
            "weak_password",
            "Password must be at least 8 characters",
        ));
    }

    let role = match payload.role.as_deref() {
        None => AccountRole::default(),
        Some(raw) => raw
            .parse::<AccountRole>()
            .map_err(|e| ApiError::bad_request("invalid_role", e.to_string()))?,
    };
    if !role.is_self_registrable() {
        return Err(ApiError::forbidden(
            "Manager accounts are assigned by an administrator",
        ));
    }

    let password_hash = hash_password(&payload.password).map_err(|e| match e {
        PasswordError::TooShort => ApiError::bad_request("weak_password", e.to_string()),
        _ => AppError::Internal(e.to_string()).into(),
    })?;

    let (user, _wallet) = UserRepository::new(state.conn())
        .create_with_wallet(CreateUserInput {
            username: username.to_string(),
            email: payload.email.filter(|e| !e.trim().is_empty()),
            password_hash,
            role,
            is_admin: false,
        })
        .await?;

    info!(user_id = user.id, role = %role, "New user registered");

    Ok((StatusCode::CREATED, Json(json!({ "user": user_info(user) }))))
}

/// POST /auth/login - Authenticate and issue tokens.
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = UserRepository::new(state.conn())
        .find_by_username(payload.username.trim())
        .await?
        .ok_or_else(|| {
            info!(username = %payload.username, "Login attempt for unknown user");
            invalid_credentials()
        })?;

    if !user.is_active {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "account_disabled",
            "This account has been disabled",
        ));
    }

    let valid = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        info!(user_id = user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    let role = AccountRole::from(user.role).to_string();
    let jwt = &state.jwt_service;
    let access_token = jwt
        .generate_access_token(user.id, &role, user.is_admin)
        .map_err(|e| token_error(&e))?;
    let refresh_token = jwt
        .generate_refresh_token(user.id, &role, user.is_admin)
        .map_err(|e| token_error(&e))?;

    let ttl = i64::try_from(jwt.refresh_token_expires_in()).unwrap_or(i64::MAX / 1000);
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    SessionRepository::new(state.conn())
        .create(user.id, &refresh_token, Utc::now() + Duration::seconds(ttl), user_agent)
        .await?;

    info!(user_id = user.id, "User logged in successfully");

    Ok(Json(LoginResponse {
        user: user_info(user),
        access_token,
        refresh_token,
        expires_in: jwt.access_token_expires_in(),
    }))
}

/// POST /auth/refresh - Issue a new access token from a live session.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<impl IntoResponse> {
    let jwt = &state.jwt_service;
    let claims = jwt.validate_token(&payload.refresh_token).map_err(|e| {
        let (code, message) = match e {
            domus_shared::JwtError::Expired => ("token_expired", "Refresh token has expired"),
            _ => ("invalid_token", "Invalid refresh token"),
        };
        ApiError::new(StatusCode::UNAUTHORIZED, code, message)
    })?;

    let session = SessionRepository::new(state.conn())
        .find_by_token(&payload.refresh_token)
        .await?;
    if session.is_none_or(|s| s.user_id != claims.user_id()) {
        return Err(ApiError::new(
            StatusCode::UNAUTHORIZED,
            "session_revoked",
            "Session is no longer valid",
        ));
    }

    let user = UserRepository::new(state.conn())
        .find_by_id(claims.user_id())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::UNAUTHORIZED,
                "account_disabled",
                "This account has been disabled",
            )
        })?;

    let access_token = jwt
        .generate_access_token(
            user.id,
            AccountRole::from(user.role).as_str(),
            user.is_admin,
        )
        .map_err(|e| token_error(&e))?;

    Ok(Json(RefreshResponse {
        access_token,
        expires_in: jwt.access_token_expires_in(),
    }))
}

/// POST /auth/logout - Revoke the session holding a refresh token.
async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<LogoutRequest>,
) -> ApiResult<impl IntoResponse> {
    let revoked = SessionRepository::new(state.conn())
        .revoke_by_token(&payload.refresh_token)
        .await?;

    info!(user_id = auth.user_id(), revoked, "User logged out");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /me - The caller's account.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let user = UserRepository::new(state.conn())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user_info(user)))
}
