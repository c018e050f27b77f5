//! Cross-model views: similarity to the human reference, correlation, PCA.

use axum::{
    extract::{State, Query},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use ibdseq_common::error::ApiError;
use ibdseq_stats::comparison::compare_models;
use ibdseq_stats::correlation::compute_correlation_matrix;
use ibdseq_stats::dataset::condition_mean_samples;
use ibdseq_stats::pca::compute_pca_projection;
use ibdseq_stats::scorer::ModelSimilarityScore;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedSimilarity {
    pub name: String,
    #[serde(flatten)]
    pub score: ModelSimilarityScore,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub reference_model: String,
    pub models: Vec<NamedSimilarity>,
}

/// GET /api/model_comparison - mouse models ranked by similarity to the reference
pub async fn model_comparison(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let reference = &state.scoring.reference_model;
    let scores = compare_models(&state.catalog, &state.dataset, reference, &state.scoring.similarity)?;

    let models = scores
        .into_iter()
        .map(|score| NamedSimilarity {
            name: state
                .catalog
                .model(&score.model)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| score.model.clone()),
            score,
        })
        .collect();

    Ok(Json(ComparisonResponse { reference_model: reference.clone(), models }))
}

/// GET /api/correlation - model × model Pearson matrix of mean expression
pub async fn correlation_matrix(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let matrix = compute_correlation_matrix(&state.dataset.expression_by_model())?;
    Ok(Json(matrix))
}

#[derive(Deserialize, Default)]
pub struct PcaQuery {
    pub components: Option<String>,
}

/// GET /api/pca - projection of every (model, condition) mean profile
pub async fn pca_projection(
    State(state): State<SharedState>,
    Query(q): Query<PcaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let components = match q.components.as_deref() {
        None | Some("") => 2,
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ApiError::BadRequest(format!("components must be a positive integer, got '{raw}'")))?,
    };
    let samples = condition_mean_samples(&state.dataset.models)?;
    let projection = compute_pca_projection(&samples, components)?;
    Ok(Json(projection))
}
