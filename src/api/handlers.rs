use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::responses::{HealthResponse, PaymentAcceptedResponse};
use crate::models::ValidatedPayment;

use super::routes::AppState;

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Liveness check endpoint.
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Prometheus scrape endpoint. 404 when metrics are disabled.
pub async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match state.metrics_handle {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// ============================================================================
// Payment Handlers
// ============================================================================

/// Acknowledges a payment forwarded by the gate.
///
/// Reads the rewritten body, so `idempotencyKey` must be present. Charging
/// and deduplication belong to the payment processor; this only echoes what
/// the gate let through.
pub async fn accept_payment(
    Json(payment): Json<ValidatedPayment>,
) -> (StatusCode, Json<PaymentAcceptedResponse>) {
    tracing::info!(
        key = %payment.idempotency_key.fingerprint(),
        "Payment accepted for processing"
    );

    (
        StatusCode::ACCEPTED,
        Json(PaymentAcceptedResponse::from(payment)),
    )
}
