//! Router tests for paths answered before any database access.
//!
//! The state holds a disconnected database handle, so every case here must be
//! decided by routing, authentication or request validation.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use fake::{Fake, faker::internet::en::Username};
use http_body_util::BodyExt;
use rstest::rstest;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

use domus_api::{AppState, create_router};
use domus_shared::{JwtService, config::JwtConfig};

fn jwt_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "router-test-secret".to_string(),
        access_token_expiry_secs: 900,
        refresh_token_expiry_secs: 3600,
    })
}

fn app() -> Router {
    create_router(AppState::new(DatabaseConnection::Disconnected, jwt_service()))
}

fn token(role: &str, is_admin: bool) -> String {
    jwt_service()
        .generate_access_token(42, role, is_admin)
        .expect("token")
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, bearer: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

#[tokio::test]
async fn test_health() {
    let request = Request::get("/api/v1/health").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_reports_missing_database() {
    let request = Request::get("/api/v1/health/ready").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}

#[rstest]
#[case("/api/v1/wallet")]
#[case("/api/v1/payments")]
#[case("/api/v1/me")]
#[case("/api/v1/notifications")]
#[tokio::test]
async fn test_protected_routes_require_token(#[case] uri: &str) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let request = Request::get("/api/v1/wallet")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[rstest]
#[case("/api/v1/wallet/charge", json!({ "amount": "abc" }))]
#[case("/api/v1/wallet/charge", json!({ "amount": "" }))]
#[case("/api/v1/wallet/withdraw", json!({ "amount": "ten" }))]
#[case("/api/v1/wallet/withdraw", json!({ "amount": "-5.00" }))]
#[case("/api/v1/wallet/withdraw", json!({ "amount": "0" }))]
#[case("/api/v1/wallet/charge", json!({ "amount": "79228162514264337593543950335" }))]
#[case("/api/v1/wallet/charge", json!({ "amount": "-79228162514264337593543950335" }))]
#[case("/api/v1/wallet/withdraw", json!({ "amount": "100000000.00" }))]
#[tokio::test]
async fn test_bad_amounts_are_rejected(#[case] uri: &str, #[case] body: Value) {
    let token = token("resident", false);
    let (status, body) = send(json_request("POST", uri, Some(&token), &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_amount");
}

#[tokio::test]
async fn test_unknown_bill_type() {
    let token = token("manager", false);
    let body = json!({ "building_id": 1, "amount": "12.00", "bill_type": "steam" });
    let (status, body) = send(json_request("POST", "/api/v1/payments/bills", Some(&token), &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_bill_type");
}

#[tokio::test]
async fn test_blank_receipt_number() {
    let token = token("resident", false);
    let body = json!({ "subscription_id": 1, "receipt_number": "   " });
    let (status, body) = send(json_request(
        "POST",
        "/api/v1/payments/subscription",
        Some(&token),
        &body,
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_receipt_number");
}

#[tokio::test]
async fn test_subscription_period_must_not_run_backwards() {
    let token = token("manager", false);
    let body = json!({
        "user_id": 7,
        "amount": "80.00",
        "start_date": "2026-03-31",
        "end_date": "2026-03-01"
    });
    let (status, body) = send(json_request(
        "POST",
        "/api/v1/buildings/1/subscriptions",
        Some(&token),
        &body,
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_period");
}

#[rstest]
#[case(json!({ "username": "ann", "password": "short" }), StatusCode::BAD_REQUEST, "weak_password")]
#[case(json!({ "username": "  ", "password": "long-enough" }), StatusCode::BAD_REQUEST, "invalid_username")]
#[case(json!({ "username": "ann", "password": "long-enough", "role": "landlord" }), StatusCode::BAD_REQUEST, "invalid_role")]
#[case(json!({ "username": "ann", "password": "long-enough", "role": "manager" }), StatusCode::FORBIDDEN, "forbidden")]
#[tokio::test]
async fn test_register_validation(
    #[case] body: Value,
    #[case] expected_status: StatusCode,
    #[case] code: &str,
) {
    let (status, body) = send(json_request("POST", "/api/v1/auth/register", None, &body)).await;

    assert_eq!(status, expected_status);
    assert_eq!(body["error"], code);
}

#[rstest]
#[case("POST", "/api/v1/buildings", json!({ "name": "Tower", "address": "1 Main St" }))]
#[case("POST", "/api/v1/buildings/1/manager", json!({ "user_id": 3 }))]
#[case("POST", "/api/v1/admin/faqs", json!({ "question": "Q?", "answer": "A." }))]
#[tokio::test]
async fn test_admin_routes_refuse_non_admins(
    #[case] method: &str,
    #[case] uri: &str,
    #[case] body: Value,
) {
    let token = token("resident", false);
    let (status, body) = send(json_request(method, uri, Some(&token), &body)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_short_password_is_refused_for_any_username() {
    for _ in 0..5 {
        let username: String = Username().fake();
        let body = json!({ "username": username, "password": "1234567" });
        let (status, body) = send(json_request("POST", "/api/v1/auth/register", None, &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "weak_password");
    }
}

#[tokio::test]
async fn test_business_profile_requires_business_role() {
    let token = token("resident", false);
    let body = json!({ "business_name": "Sparkle Ltd" });
    let (status, _) = send(json_request("POST", "/api/v1/business-profile", Some(&token), &body)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_only_residents_report_issues() {
    let token = token("business", false);
    let body = json!({ "description": "Leaking tap" });
    let (status, _) = send(json_request("POST", "/api/v1/issues", Some(&token), &body)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
