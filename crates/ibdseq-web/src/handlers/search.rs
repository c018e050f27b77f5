//! Gene symbol autocomplete.

use axum::{
    extract::{State, Query},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::state::SharedState;

pub const MAX_RESULTS: usize = 10;

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<String>,
}

/// GET /api/search_gene?query=
pub async fn search_gene(
    State(state): State<SharedState>,
    Query(q): Query<SearchQuery>,
) -> impl IntoResponse {
    let query = q.query.unwrap_or_default();
    let results = state.catalog.search_genes(&query, MAX_RESULTS);
    Json(SearchResponse { query, results })
}
