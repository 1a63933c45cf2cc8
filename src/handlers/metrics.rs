// Prometheus exposition endpoint handler

use axum::response::IntoResponse;
use http::header;

use crate::metrics::METRICS;

/// Handler for GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.render(),
    )
}
