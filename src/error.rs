use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::responses::GateErrorResponse;

/// Startup and wiring failures.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Reasons the payment gate stops a request.
///
/// Every variant is terminal: it becomes the response and the downstream
/// handler never runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    #[error("Validation error: {}", .0.join("; "))]
    SchemaValidation(Vec<String>),

    #[error("X-Idempotency-Key header is required")]
    MissingIdempotencyKey,

    #[error("Request body too large")]
    PayloadTooLarge,
}

impl GateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GateError::SchemaValidation(_) | GateError::MissingIdempotencyKey => {
                StatusCode::BAD_REQUEST
            }
            GateError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Label used for metrics and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            GateError::SchemaValidation(_) => "schema_rejected",
            GateError::MissingIdempotencyKey => "missing_key",
            GateError::PayloadTooLarge => "too_large",
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            GateError::SchemaValidation(details) => GateErrorResponse::validation(details),
            other => GateErrorResponse::new(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
