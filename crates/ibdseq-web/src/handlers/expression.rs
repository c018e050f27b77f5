//! Gene expression bar-chart data.

use axum::{
    extract::{State, Query},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ibdseq_common::error::ApiError;
use ibdseq_stats::describe::{mean, standard_error};

use crate::handlers::split_list;
use crate::state::SharedState;

/// Genes charted when the request names none.
const DEFAULT_GENES: [&str; 5] = ["TNF", "IL6", "IL1B", "IL10", "IFNG"];

#[derive(Deserialize, Default)]
pub struct ExpressionQuery {
    pub genes: Option<String>,
    pub models: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelExpression {
    pub name: String,
    pub condition: String,
    pub values: BTreeMap<String, f64>,
    pub errors: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct ExpressionResponse {
    pub genes: Vec<String>,
    pub models: BTreeMap<String, ModelExpression>,
}

/// GET /api/gene_expression - disease-condition mean ± standard error per model
pub async fn gene_expression(
    State(state): State<SharedState>,
    Query(q): Query<ExpressionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut genes = split_list(q.genes.as_deref());
    if genes.is_empty() {
        genes = DEFAULT_GENES.iter().map(|g| g.to_string()).collect();
    }
    genes.iter_mut().for_each(|g| *g = g.to_uppercase());

    let mut model_ids = split_list(q.models.as_deref());
    if model_ids.is_empty() {
        model_ids = state.catalog.model_ids().into_iter().map(String::from).collect();
    }

    let mut models = BTreeMap::new();
    for id in &model_ids {
        let (spec, data) = state.model_data(id)?;
        let mut values = BTreeMap::new();
        let mut errors = BTreeMap::new();
        for gene in &genes {
            if let Some(v) = data.gene_values(gene, &spec.disease_condition)? {
                values.insert(gene.clone(), mean(&v));
                errors.insert(gene.clone(), standard_error(&v));
            }
        }
        models.insert(
            id.clone(),
            ModelExpression {
                name: spec.name.clone(),
                condition: spec.disease_condition.clone(),
                values,
                errors,
            },
        );
    }

    Ok(Json(ExpressionResponse { genes, models }))
}
