use axum::{Json, extract::State};
use std::sync::Arc;

use crate::models::StatsResponse;
use crate::state::AppState;

// Read-only view of the rolling metrics; does not count as a request
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(state.coordinator.snapshot())
}
