use axum::{
    http::HeaderName,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{
    propagate_header::PropagateHeaderLayer,
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::handlers;
use crate::middleware::{payment_gate, track_http_metrics, GateConfig};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state shared across handlers.
#[derive(Clone, Default)]
pub struct AppState {
    pub gate: GateConfig,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(gate: GateConfig) -> Self {
        Self {
            gate,
            metrics_handle: None,
        }
    }

    /// Adds metrics handle to the state.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

/// Routes guarded by the payment gate.
///
/// Generic over the downstream router so the gate can front any handler.
pub fn gated<S>(router: Router<S>, gate: GateConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(gate, payment_gate))
}

/// Creates the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let payments = gated(
        Router::<AppState>::new().route("/payments", post(handlers::accept_payment)),
        state.gate.clone(),
    );

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/live", get(handlers::liveness_check))
        // Metrics endpoint
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(payments)
        .layer(middleware::from_fn(track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateHeaderLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}
