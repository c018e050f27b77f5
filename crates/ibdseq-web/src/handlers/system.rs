use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub models: usize,
    pub genes: usize,
}

/// GET /api/health
pub async fn health(State(state): State<SharedState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        models: state.dataset.models.len(),
        genes: state.catalog.genes.len(),
    })
}
