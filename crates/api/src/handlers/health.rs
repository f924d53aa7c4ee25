use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use shopgate_core::types::Timestamp;

use crate::response::STATUS_SUCCESS;
use crate::state::AppState;

/// Health check response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    /// Seconds since the server started.
    pub uptime: f64,
    pub timestamp: Timestamp,
}

/// GET /health -- liveness only; does not touch the store.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: STATUS_SUCCESS,
        message: "Server is healthy",
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: Utc::now(),
    })
}
