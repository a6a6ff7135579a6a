//! Wallet routes: balance, charge and withdraw.

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::parse_amount;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};
use domus_db::{WalletRepository, entities::wallets, repositories::WalletError};
use domus_shared::AppError;

/// Creates the wallet router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallet", get(get_wallet))
        .route("/wallet/charge", post(charge_wallet))
        .route("/wallet/withdraw", post(withdraw))
}

/// Request body carrying an amount as decimal text.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    /// Amount, e.g. `"50.00"`.
    pub amount: String,
}

/// Wallet view.
#[derive(Debug, Serialize)]
pub struct WalletResponse {
    /// Current balance.
    pub balance: Decimal,
    /// Lock flag. Stored but never enforced.
    pub is_locked: bool,
}

impl From<wallets::Model> for WalletResponse {
    fn from(wallet: wallets::Model) -> Self {
        Self {
            balance: wallet.balance,
            is_locked: wallet.is_locked,
        }
    }
}

/// GET /wallet
async fn get_wallet(State(state): State<AppState>, auth: AuthUser) -> ApiResult<impl IntoResponse> {
    let wallet = WalletRepository::new(state.conn())
        .find_by_user(auth.user_id())
        .await?
        .ok_or(WalletError::NotFound(auth.user_id()))?;
    Ok(Json(WalletResponse::from(wallet)))
}

/// POST /wallet/charge - Deposit into the caller's wallet.
///
/// Any parseable amount is deposited as given, including zero or negative.
async fn charge_wallet(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<impl IntoResponse> {
    let amount = parse_amount(&payload.amount)?;

    let wallet = WalletRepository::new(state.conn())
        .deposit(auth.user_id(), amount.amount())
        .await?;

    info!(user_id = auth.user_id(), amount = %amount, balance = %wallet.balance, "Wallet charged");
    Ok(Json(WalletResponse::from(wallet)))
}

/// POST /wallet/withdraw - Guarded withdrawal; 422 when the balance is short.
async fn withdraw(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<impl IntoResponse> {
    let amount = parse_amount(&payload.amount)?;
    if !amount.is_positive() {
        return Err(ApiError::bad_request(
            "invalid_amount",
            "Withdrawal amount must be positive",
        ));
    }

    let outcome = WalletRepository::new(state.conn())
        .withdraw(auth.user_id(), amount.amount())
        .await?;

    if !outcome.withdrawn {
        return Err(AppError::InsufficientFunds(format!(
            "Balance {} does not cover {amount}",
            outcome.wallet.balance
        ))
        .into());
    }

    info!(user_id = auth.user_id(), amount = %amount, balance = %outcome.wallet.balance, "Wallet withdrawal");
    Ok(Json(WalletResponse::from(outcome.wallet)))
}
