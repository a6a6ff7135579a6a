//! Payment routes: subscription payments, utility bills and subscriptions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::{buildings::require_building_manager, parse_amount};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::auth::AuthUser,
};
use domus_core::billing::{BillType, ReceiptNumber, SubscriptionTerms};
use domus_db::{PaymentRepository, SubscriptionRepository};
use domus_shared::types::{PageRequest, PageResponse};

/// Creates the payments router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments))
        .route("/payments/subscription", post(pay_subscription))
        .route("/payments/bills", post(pay_bill))
        .route("/buildings/{id}/bill-payments", get(list_bill_payments))
        .route("/buildings/{id}/subscriptions", post(create_subscription))
        .route("/subscriptions", get(list_subscriptions))
}

/// Request body for paying a subscription.
#[derive(Debug, Deserialize)]
pub struct PaySubscriptionRequest {
    /// Subscription being paid.
    pub subscription_id: i64,
    /// Caller-supplied receipt number, unique across all payments.
    pub receipt_number: String,
}

/// Request body for paying a utility bill.
#[derive(Debug, Deserialize)]
pub struct PayBillRequest {
    /// Building the bill belongs to.
    pub building_id: i64,
    /// Amount as decimal text.
    pub amount: String,
    /// electricity, water or gas.
    pub bill_type: String,
}

/// Request body for defining a subscription.
#[derive(Debug, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// Subscriber.
    pub user_id: i64,
    /// Amount as decimal text.
    pub amount: String,
    /// First day covered.
    pub start_date: NaiveDate,
    /// Last day covered.
    pub end_date: NaiveDate,
}

/// POST /payments/subscription - Pay a subscription's amount.
async fn pay_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PaySubscriptionRequest>,
) -> ApiResult<impl IntoResponse> {
    let receipt = ReceiptNumber::parse(&payload.receipt_number)
        .map_err(|e| ApiError::bad_request("invalid_receipt_number", e.to_string()))?;

    let payment = PaymentRepository::new(state.conn())
        .pay_subscription(auth.user_id(), payload.subscription_id, &receipt)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

/// POST /payments/bills - Record a utility bill paid by the caller.
async fn pay_bill(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PayBillRequest>,
) -> ApiResult<impl IntoResponse> {
    let amount = parse_amount(&payload.amount)?;
    let bill_type = payload
        .bill_type
        .parse::<BillType>()
        .map_err(|e| ApiError::bad_request("invalid_bill_type", e.to_string()))?;

    let record = PaymentRepository::new(state.conn())
        .pay_bill(auth.user_id(), payload.building_id, amount.amount(), bill_type)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "payment": record.payment, "bill_payment": record.bill })),
    ))
}

/// GET /payments?page=&per_page= - The caller's payments, newest first.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
) -> ApiResult<impl IntoResponse> {
    let (payments, total) = PaymentRepository::new(state.conn())
        .list_for_user(auth.user_id(), &page)
        .await?;
    Ok(Json(PageResponse::new(payments, &page, total)))
}

/// GET /buildings/{id}/bill-payments (building manager)
async fn list_bill_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    require_building_manager(&state, &auth, building_id).await?;

    let bills = PaymentRepository::new(state.conn())
        .list_bills_for_building(building_id)
        .await?;
    Ok(Json(json!({ "bill_payments": bills })))
}

/// POST /buildings/{id}/subscriptions - Define a subscription (building manager).
async fn create_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(building_id): Path<i64>,
    Json(payload): Json<CreateSubscriptionRequest>,
) -> ApiResult<impl IntoResponse> {
    let amount = parse_amount(&payload.amount)?;
    let terms = SubscriptionTerms::new(amount.amount(), payload.start_date, payload.end_date)
        .map_err(|e| ApiError::bad_request("invalid_period", e.to_string()))?;

    require_building_manager(&state, &auth, building_id).await?;

    let subscription = SubscriptionRepository::new(state.conn())
        .create(building_id, payload.user_id, &terms)
        .await?;
    Ok((StatusCode::CREATED, Json(subscription)))
}

/// GET /subscriptions - The caller's subscriptions.
async fn list_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let subscriptions = SubscriptionRepository::new(state.conn())
        .list_for_user(auth.user_id())
        .await?;
    Ok(Json(json!({ "subscriptions": subscriptions })))
}
