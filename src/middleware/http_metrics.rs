use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::observability::{get_metrics, LatencyTimer};

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Records count and latency of every request, keyed by method, route and status.
///
/// The path label is the route template, so label cardinality stays bounded.
pub async fn track_http_metrics(req: Request, next: Next) -> Response {
    let timer = LatencyTimer::new();
    let method = req.method().to_string();
    let path = route_label(req.extensions().get::<MatchedPath>());

    let response = next.run(req).await;

    get_metrics().record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        timer.elapsed_ms(),
    );
    response
}

fn route_label(matched: Option<&MatchedPath>) -> String {
    matched
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string())
}
