//! Startup wiring shared by the server and the analysis binary.

use tracing::info;
use tracing_subscriber::EnvFilter;

use ibdseq_common::catalog::Catalog;
use ibdseq_stats::dataset::{DatasetSource, JsonDatasetSource};
use ibdseq_test_utils::FixtureDatasetSource;

use crate::config::Config;

/// Structured logging; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ibdseq_web=debug,info")),
        )
        .init();
}

pub fn load_catalog(config: &Config) -> anyhow::Result<Catalog> {
    let catalog = match &config.data.catalog_path {
        Some(path) => {
            info!("Loading catalog from {path}");
            Catalog::load(path)?
        }
        None => Catalog::default(),
    };
    config.validate_against(&catalog)?;
    Ok(catalog)
}

/// JSON export when `dataset_path` is set, simulated fixtures otherwise.
pub fn dataset_source(config: &Config, catalog: &Catalog) -> Box<dyn DatasetSource> {
    match &config.data.dataset_path {
        Some(path) => Box::new(JsonDatasetSource::new(path)),
        None => {
            tracing::warn!("No dataset_path configured; serving SIMULATED data (seed {})", config.data.seed);
            Box::new(FixtureDatasetSource::new(catalog.clone(), config.data.seed))
        }
    }
}
