//! Therapeutic target rankings.

use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use ibdseq_common::error::ApiError;
use ibdseq_stats::scorer::{rank_targets, TargetScore};

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct TargetResponse {
    pub targets: Vec<TargetScore>,
}

/// GET /api/target_validation - all candidates, best overall score first
pub async fn target_validation(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let targets = rank_targets(&state.dataset.target_evidence, &state.scoring.targets)?;
    Ok(Json(TargetResponse { targets }))
}
