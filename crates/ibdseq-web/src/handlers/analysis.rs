//! Per-model analysis endpoints: DE tables, volcano points, fold changes.

use axum::{
    extract::{State, Query},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use ibdseq_common::error::ApiError;
use ibdseq_stats::describe::mean;
use ibdseq_stats::differential::DifferentialExpressionRecord;
use ibdseq_stats::fold_change::{compute_fold_change, Direction};
use ibdseq_stats::volcano::{volcano_points, VolcanoPoint};

use crate::handlers::required;
use crate::state::SharedState;

#[derive(Deserialize, Default)]
pub struct ModelQuery {
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DifferentialResponse {
    pub comparison: String,
    pub records: Vec<DifferentialExpressionRecord>,
}

#[derive(Debug, Serialize)]
pub struct VolcanoResponse {
    pub comparison: String,
    pub points: Vec<VolcanoPoint>,
}

/// GET /api/differential_expression?model=
pub async fn differential_expression(
    State(state): State<SharedState>,
    Query(q): Query<ModelQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (spec, _) = state.model_data(required(&q.model, "model")?)?;
    let records = state.dataset.differential_expression_for(spec)?;
    Ok(Json(DifferentialResponse { comparison: spec.comparison_name(), records }))
}

/// GET /api/volcano?model=
pub async fn volcano(
    State(state): State<SharedState>,
    Query(q): Query<ModelQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (spec, _) = state.model_data(required(&q.model, "model")?)?;
    let records = state.dataset.differential_expression_for(spec)?;
    let points = volcano_points(&records)?;
    Ok(Json(VolcanoResponse { comparison: spec.comparison_name(), points }))
}

#[derive(Deserialize, Default)]
pub struct FoldChangeQuery {
    pub gene: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldChangeResponse {
    pub gene: String,
    pub model: String,
    pub control_mean: f64,
    pub disease_mean: f64,
    pub value: f64,
    pub direction: Direction,
}

/// GET /api/fold_change?gene=&model= - disease mean over control mean
pub async fn fold_change(
    State(state): State<SharedState>,
    Query(q): Query<FoldChangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let gene = required(&q.gene, "gene")?.to_uppercase();
    let (spec, data) = state.model_data(required(&q.model, "model")?)?;

    let control = data
        .gene_values(&gene, &spec.control_condition)?
        .ok_or_else(|| ApiError::NotFound(format!("Unknown gene: {gene}")))?;
    let disease = data
        .gene_values(&gene, &spec.disease_condition)?
        .ok_or_else(|| ApiError::NotFound(format!("Unknown gene: {gene}")))?;
    let (control_mean, disease_mean) = (mean(&control), mean(&disease));
    let fc = compute_fold_change(control_mean, disease_mean)?;

    Ok(Json(FoldChangeResponse {
        gene,
        model: spec.id.clone(),
        control_mean,
        disease_mean,
        value: fc.value,
        direction: fc.direction,
    }))
}
