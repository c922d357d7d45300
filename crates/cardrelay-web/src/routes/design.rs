//! Card design submission.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use cardrelay_core::{design::process_design, DesignSubmission, RelayError, RelayEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDesignResponse {
    pub success: bool,
    pub design: DesignSubmission,
    pub notified_clients: usize,
}

/// POST /api/card/design - process a card and notify every push channel.
pub async fn submit_design(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitDesignResponse>, ApiError> {
    let Json(body) = payload.map_err(|e| RelayError::validation(e.body_text()))?;

    let design = process_design(&body, &state.design_ids)?;
    let notified_clients = state
        .channels
        .broadcast(&RelayEvent::DesignProcessed(design.clone()))?;
    info!(design_id = %design.id, notified_clients, "Design broadcast to channels");

    Ok(Json(SubmitDesignResponse {
        success: true,
        design,
        notified_clients,
    }))
}
