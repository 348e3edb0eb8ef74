pub mod http_metrics;
pub mod payment_gate;

pub use http_metrics::track_http_metrics;
pub use payment_gate::{
    evaluate_payment, extract_idempotency_key, payment_gate, GateConfig, GateOutcome,
    DEFAULT_MAX_BODY_BYTES,
};
