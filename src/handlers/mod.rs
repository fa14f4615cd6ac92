mod health;
mod metrics;
mod predict;
mod stats;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use predict::predict_handler;
pub use stats::stats_handler;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;

use crate::error::GatewayError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/predict", post(predict_handler))
        .route("/api/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({
            "error": self.kind().as_str(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
