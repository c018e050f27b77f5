//! Pathway enrichment heat-map data.

use axum::{
    extract::{State, Query},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ibdseq_common::error::ApiError;
use ibdseq_stats::differential::rank_pathways;

use crate::handlers::split_list;
use crate::state::SharedState;

#[derive(Deserialize, Default)]
pub struct PathwayQuery {
    pub pathway: Option<String>,
    pub models: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ModelPathways {
    pub name: String,
    /// pathway → enrichment score
    pub values: BTreeMap<String, f64>,
    /// pathway → raw p-value
    pub pvalues: BTreeMap<String, f64>,
    /// pathway → adjusted p-value
    pub padj: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
pub struct PathwayResponse {
    pub pathway: Option<String>,
    pub pathways: Vec<String>,
    pub models: BTreeMap<String, ModelPathways>,
}

/// GET /api/pathway_analysis - enrichment per model, optionally for one pathway
pub async fn pathway_analysis(
    State(state): State<SharedState>,
    Query(q): Query<PathwayQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let selected = q.pathway.as_deref().map(str::trim).filter(|p| !p.is_empty());
    let pathways: Vec<String> = match selected {
        Some(p) => {
            let known = state
                .catalog
                .pathways
                .iter()
                .find(|name| name.eq_ignore_ascii_case(p))
                .ok_or_else(|| ApiError::NotFound(format!("Unknown pathway: {p}")))?;
            vec![known.clone()]
        }
        None => state.catalog.pathways.clone(),
    };

    let mut model_ids = split_list(q.models.as_deref());
    if model_ids.is_empty() {
        model_ids = state.catalog.model_ids().into_iter().map(String::from).collect();
    }

    let mut models = BTreeMap::new();
    for id in &model_ids {
        let spec = state.model_spec(id)?;
        let records = match state.dataset.pathways.get(id) {
            Some(obs) => rank_pathways(obs)?,
            None => Vec::new(),
        };
        let mut entry = ModelPathways {
            name: spec.name.clone(),
            values: BTreeMap::new(),
            pvalues: BTreeMap::new(),
            padj: BTreeMap::new(),
        };
        for r in records.iter().filter(|r| pathways.contains(&r.pathway)) {
            entry.values.insert(r.pathway.clone(), r.enrichment_score);
            entry.pvalues.insert(r.pathway.clone(), r.pvalue);
            entry.padj.insert(r.pathway.clone(), r.padj);
        }
        models.insert(id.clone(), entry);
    }

    Ok(Json(PathwayResponse {
        pathway: pathways.first().filter(|_| selected.is_some()).cloned(),
        pathways,
        models,
    }))
}
