use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{IdempotencyKey, ValidatedPayment};

/// Error label for schema failures.
pub const VALIDATION_ERROR: &str = "Validation error";

/// Body of every gate rejection.
///
/// `details` is only present for schema failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl GateErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn validation(details: Vec<String>) -> Self {
        Self {
            error: VALIDATION_ERROR.to_string(),
            details: Some(details),
        }
    }
}

/// Acknowledgement returned by the downstream payment endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAcceptedResponse {
    pub status: String,
    pub amount: f64,
    pub description: String,
    #[serde(rename = "idempotencyKey")]
    pub idempotency_key: IdempotencyKey,
}

impl From<ValidatedPayment> for PaymentAcceptedResponse {
    fn from(payment: ValidatedPayment) -> Self {
        Self {
            status: "accepted".to_string(),
            amount: payment.amount,
            description: payment.description,
            idempotency_key: payment.idempotency_key,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}
