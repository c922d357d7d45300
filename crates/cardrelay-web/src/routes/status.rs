//! Liveness and health endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub connected_clients: usize,
}

/// GET / - liveness probe.
pub async fn index() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok",
        message: "Card relay is running",
    })
}

/// GET /api/health - current push-channel count.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: cardrelay_core::now_timestamp(),
        connected_clients: state.channels.len(),
    })
}
