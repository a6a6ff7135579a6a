//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};
use domus_core::auth::AccountRole;
use domus_shared::{Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT access tokens.
///
/// Valid claims are stored in the request extensions for [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (error, message) = match e {
                JwtError::Expired => ("token_expired", "Token has expired"),
                _ => ("invalid_token", "Invalid or malformed token"),
            };

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response()
        }
    }
}

/// Extractor for the authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the caller's user ID.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.0.user_id()
    }

    /// Returns the caller's account role.
    #[must_use]
    pub fn role(&self) -> AccountRole {
        self.0.role.parse().unwrap_or_default()
    }

    /// Returns true for site admins.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// Fails with 403 unless the caller is a site admin.
    ///
    /// # Errors
    ///
    /// Returns a forbidden `ApiError` for non-admins.
    pub fn require_admin(&self) -> ApiResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden("Administrator access required"))
        }
    }

    /// Fails with 403 unless the caller holds `role`.
    ///
    /// # Errors
    ///
    /// Returns a forbidden `ApiError` for any other role.
    pub fn require_role(&self, role: AccountRole) -> ApiResult<()> {
        if self.role() == role {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!("Only {role} accounts can do this")))
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user(role: &str, admin: bool) -> AuthUser {
        AuthUser(Claims::new(9, role, admin, Utc::now() + Duration::minutes(5)))
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_role_checks() {
        let manager = user("manager", false);
        assert_eq!(manager.user_id(), 9);
        assert!(manager.require_role(AccountRole::Manager).is_ok());
        assert!(manager.require_role(AccountRole::Business).is_err());
        assert!(manager.require_admin().is_err());
        assert!(user("resident", true).require_admin().is_ok());
    }
}
