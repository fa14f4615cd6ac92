use axum::{Json, extract::State};
use std::sync::Arc;

use crate::error::GatewayError;
use crate::models::{PredictRequest, PredictResponse};
use crate::state::AppState;

pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, GatewayError> {
    // no I/O inside; locks are held only for single in-memory updates
    state.coordinator.handle(&payload).map(Json)
}
