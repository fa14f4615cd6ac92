use axum::response::IntoResponse;

use crate::metrics;

// prometheus text format
pub async fn metrics_handler() -> impl IntoResponse {
    metrics::render()
}
