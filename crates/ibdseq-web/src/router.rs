//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::get,
};
use tower_http::{
    services::ServeDir,
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    expression::gene_expression,
    pathways::pathway_analysis,
    models::{model_comparison, correlation_matrix, pca_projection},
    targets::target_validation,
    search::search_gene,
    analysis::{differential_expression, volcano, fold_change},
    system::health,
};

/// Build and return the full Axum router. Anything outside `/api` is served
/// from `static_dir`.
pub fn build_router(state: AppState, static_dir: &str) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Website data
        .route("/api/gene_expression",   get(gene_expression))
        .route("/api/pathway_analysis",  get(pathway_analysis))
        .route("/api/model_comparison",  get(model_comparison))
        .route("/api/target_validation", get(target_validation))
        .route("/api/search_gene",       get(search_gene))

        // Analysis endpoints
        .route("/api/differential_expression", get(differential_expression))
        .route("/api/volcano",     get(volcano))
        .route("/api/fold_change", get(fold_change))
        .route("/api/correlation", get(correlation_matrix))
        .route("/api/pca",         get(pca_projection))
        .route("/api/health",      get(health))

        // Static site
        .fallback_service(ServeDir::new(static_dir))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
