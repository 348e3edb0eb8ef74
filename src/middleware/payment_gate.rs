//! Request gate for payment submissions.
//!
//! Validates the JSON body against the payment schema, then requires an
//! `X-Idempotency-Key` header. Accepted requests continue downstream with
//! the key copied into the body as `idempotencyKey` and a
//! [`ValidatedPayment`] in the request extensions. Rejected requests are
//! answered here and never reach the next handler.

use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde_json::Value;

use crate::config::GateSettings;
use crate::error::GateError;
use crate::models::{
    IdempotencyKey, ValidatedPayment, IDEMPOTENCY_KEY_FIELD, IDEMPOTENCY_KEY_HEADER,
};
use crate::observability::{get_metrics, LatencyTimer};
use crate::validation::{check_payment_schema, decode_body};

/// Default body limit, matching common JSON body parser defaults.
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024;

/// Immutable state shared by every gate invocation.
#[derive(Debug, Clone)]
pub struct GateConfig {
    pub max_body_bytes: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl From<&GateSettings> for GateConfig {
    fn from(settings: &GateSettings) -> Self {
        Self {
            max_body_bytes: settings.max_body_bytes,
        }
    }
}

/// Result of a successful gate pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    /// The original body with `idempotencyKey` added.
    pub body: Value,
    pub payment: ValidatedPayment,
}

/// Decides whether a request may proceed.
///
/// Schema violations win over a missing key: the header is only looked at
/// once the body is valid.
pub fn evaluate_payment(headers: &HeaderMap, body: &[u8]) -> Result<GateOutcome, GateError> {
    let decoded =
        decode_body(body, is_json_content_type(headers)).map_err(GateError::SchemaValidation)?;
    let request = check_payment_schema(&decoded).map_err(GateError::SchemaValidation)?;

    let key = extract_idempotency_key(headers).ok_or(GateError::MissingIdempotencyKey)?;

    Ok(GateOutcome {
        body: with_idempotency_key(decoded, &key),
        payment: ValidatedPayment::new(request, key),
    })
}

/// Reads the idempotency key header. Empty or non-text values count as absent.
pub fn extract_idempotency_key(headers: &HeaderMap) -> Option<IdempotencyKey> {
    headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(IdempotencyKey::new)
}

fn with_idempotency_key(body: Value, key: &IdempotencyKey) -> Value {
    match body {
        Value::Object(mut map) => {
            map.insert(
                IDEMPOTENCY_KEY_FIELD.to_string(),
                Value::String(key.as_str().to_string()),
            );
            Value::Object(map)
        }
        other => other,
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json"
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// Axum middleware wrapping [`evaluate_payment`].
///
/// Mount with `axum::middleware::from_fn_with_state(GateConfig, payment_gate)`.
pub async fn payment_gate(
    State(config): State<GateConfig>,
    req: Request,
    next: Next,
) -> Result<Response, GateError> {
    let timer = LatencyTimer::new();
    let metrics = get_metrics();

    let result = admit(&config, req).await;
    metrics.record_gate_latency(timer.elapsed_ms());

    match result {
        Ok(req) => {
            metrics.record_gate_decision("accepted");
            Ok(next.run(req).await)
        }
        Err(err) => {
            metrics.record_gate_decision(err.outcome());
            tracing::warn!(outcome = err.outcome(), error = %err, "Payment request rejected");
            Err(err)
        }
    }
}

async fn admit(config: &GateConfig, req: Request) -> Result<Request, GateError> {
    let (mut parts, body) = req.into_parts();

    if declared_length(&parts.headers).is_some_and(|len| len > config.max_body_bytes) {
        return Err(GateError::PayloadTooLarge);
    }

    let bytes = axum::body::to_bytes(body, config.max_body_bytes)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Failed to buffer payment body");
            GateError::PayloadTooLarge
        })?;

    let outcome = evaluate_payment(&parts.headers, &bytes)?;

    tracing::debug!(
        key = %outcome.payment.idempotency_key.fingerprint(),
        "Payment request accepted"
    );

    let forwarded = Bytes::from(outcome.body.to_string());
    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(forwarded.len()));
    parts.extensions.insert(outcome.payment);

    Ok(Request::from_parts(parts, Body::from(forwarded)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_headers(key: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = key {
            headers.insert(IDEMPOTENCY_KEY_HEADER, HeaderValue::from_str(key).unwrap());
        }
        headers
    }

    #[test]
    fn test_evaluate_accepts_and_augments() {
        let body = br#"{"amount":10.5,"description":"coffee"}"#;
        let outcome = evaluate_payment(&json_headers(Some("abc123")), body).unwrap();
        assert_eq!(
            outcome.body,
            json!({"amount": 10.5, "description": "coffee", "idempotencyKey": "abc123"})
        );
        assert_eq!(outcome.payment.idempotency_key.as_str(), "abc123");
    }

    #[test]
    fn test_schema_errors_take_precedence_over_missing_key() {
        let body = br#"{"amount":0,"description":"coffee"}"#;
        let err = evaluate_payment(&json_headers(None), body).unwrap_err();
        assert_eq!(
            err,
            GateError::SchemaValidation(vec!["\"amount\" must be a positive number".to_string()])
        );
    }

    #[test]
    fn test_missing_and_empty_key() {
        let body = br#"{"amount":1,"description":"coffee"}"#;
        assert_eq!(
            evaluate_payment(&json_headers(None), body).unwrap_err(),
            GateError::MissingIdempotencyKey
        );
        assert_eq!(
            evaluate_payment(&json_headers(Some("")), body).unwrap_err(),
            GateError::MissingIdempotencyKey
        );
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let body = br#"{"amount":10.5,"description":"coffee"}"#;
        let headers = json_headers(Some("abc123"));
        assert_eq!(
            evaluate_payment(&headers, body).unwrap(),
            evaluate_payment(&headers, body).unwrap()
        );
    }

    #[test]
    fn test_json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_json_content_type(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("Application/JSON; charset=utf-8"),
        );
        assert!(is_json_content_type(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/merge-patch+json"),
        );
        assert!(is_json_content_type(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json_content_type(&headers));
    }

    #[test]
    fn test_non_json_content_type_is_empty_object() {
        let mut headers = json_headers(Some("abc123"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let body = br#"{"amount":10.5,"description":"coffee"}"#;
        assert_eq!(
            evaluate_payment(&headers, body).unwrap_err(),
            GateError::SchemaValidation(vec![
                "\"amount\" is required".to_string(),
                "\"description\" is required".to_string(),
            ])
        );
    }
}
