#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    http::{header, Request, StatusCode},
    routing::post,
    Extension, Json, Router,
};
use payment_gate::api::{create_router, gated, AppState};
use payment_gate::middleware::GateConfig;
use payment_gate::models::ValidatedPayment;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";

/// Full application router with default settings and no metrics recorder.
pub fn test_app() -> Router {
    create_router(AppState::default())
}

/// Gate in front of a handler that reports exactly what it received.
pub fn echo_app(gate: GateConfig) -> Router {
    gated(Router::new().route("/echo", post(echo)), gate)
}

async fn echo(Extension(payment): Extension<ValidatedPayment>, body: Bytes) -> Json<Value> {
    let forwarded: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Json(json!({ "body": forwarded, "extension": payment }))
}

pub fn json_request(uri: &str, body: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header(IDEMPOTENCY_HEADER, key);
    }
    builder.body(Body::from(body.to_string())).expect("request build")
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("request execution");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body extraction");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json deserialization")
    };
    (status, json)
}
