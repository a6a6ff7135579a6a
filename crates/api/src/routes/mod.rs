//! API route definitions.

use axum::{Router, middleware};
use domus_shared::types::Money;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::auth::auth_middleware,
};

pub mod auth;
pub mod buildings;
pub mod engagement;
pub mod faqs;
pub mod health;
pub mod issues;
pub mod messages;
pub mod payments;
pub mod services;
pub mod wallet;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(buildings::routes())
        .merge(services::routes())
        .merge(wallet::routes())
        .merge(payments::routes())
        .merge(engagement::routes())
        .merge(issues::routes())
        .merge(messages::routes())
        .merge(faqs::admin_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(faqs::routes())
        .merge(protected_routes)
}

/// Parses a money amount from request text, or 400 `invalid_amount`.
pub(crate) fn parse_amount(raw: &str) -> ApiResult<Money> {
    raw.parse::<Money>()
        .map_err(|e| ApiError::bad_request("invalid_amount", e.to_string()))
}
