//! Shared application state for the web server.

use std::sync::Arc;

use ibdseq_common::catalog::{Catalog, ModelSpec};
use ibdseq_common::error::ApiError;
use ibdseq_stats::dataset::{AnalysisDataset, DatasetSource, ModelDataset};
use ibdseq_test_utils::FixtureDatasetSource;

use crate::config::ScoringConfig;

/// Shared state injected into every Axum handler. Immutable once built.
pub struct AppState {
    pub catalog: Catalog,
    pub dataset: AnalysisDataset,
    pub scoring: ScoringConfig,
}

impl AppState {
    pub fn new(catalog: Catalog, dataset: AnalysisDataset, scoring: ScoringConfig) -> Self {
        Self { catalog, dataset, scoring }
    }

    pub fn from_source(
        catalog: Catalog,
        source: &dyn DatasetSource,
        scoring: ScoringConfig,
    ) -> ibdseq_common::error::Result<Self> {
        let dataset = source.load()?;
        Ok(Self::new(catalog, dataset, scoring))
    }

    /// Default catalog over simulated fixtures.
    pub fn demo(seed: u64) -> ibdseq_common::error::Result<Self> {
        let catalog = Catalog::default();
        let source = FixtureDatasetSource::new(catalog.clone(), seed);
        Self::from_source(catalog, &source, ScoringConfig::default())
    }

    /// Catalog entry for `id`, or 404.
    pub fn model_spec(&self, id: &str) -> Result<&ModelSpec, ApiError> {
        Ok(self.catalog.require_model(id)?)
    }

    /// Catalog entry plus its expression data, or 404.
    pub fn model_data(&self, id: &str) -> Result<(&ModelSpec, &ModelDataset), ApiError> {
        let spec = self.model_spec(id)?;
        let data = self
            .dataset
            .model(id)
            .ok_or_else(|| ApiError::NotFound(format!("No expression data for model: {id}")))?;
        Ok((spec, data))
    }
}

pub type SharedState = Arc<AppState>;
