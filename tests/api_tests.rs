mod common;

use axum::{body::Body, http::{Request, StatusCode}};
use common::{json_request, send, test_app};
use payment_gate::api::responses::{GateErrorResponse, HealthResponse};
use serde_json::json;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request build")
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(test_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let health: HealthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_liveness_check() {
    let (status, _) = send(test_app(), get("/live")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_disabled_returns_not_found() {
    let (status, _) = send(test_app(), get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_gate_only_guards_payment_routes() {
    let (status, _) = send(test_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let request = json_request("/unknown", "{}", None);
    let (status, _) = send(test_app(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_is_generated_and_propagated() {
    let response = test_app().oneshot(get("/live")).await.unwrap();
    let generated = response.headers().get("x-request-id").expect("request id");
    assert!(!generated.is_empty());

    let request = Request::builder()
        .uri("/live")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-42");
}

#[tokio::test]
async fn test_rejections_carry_request_id() {
    let request = json_request("/payments", &json!({"amount": 0}).to_string(), None);
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key("x-request-id"));
}

#[test]
fn test_gate_error_response_deserializes() {
    let response: GateErrorResponse =
        serde_json::from_str(r#"{"error":"Validation error","details":["\"amount\" is required"]}"#)
            .unwrap();
    assert_eq!(response, GateErrorResponse::validation(vec!["\"amount\" is required".to_string()]));
}
