//! Configuration loading for the IBD RNA-Seq server and analysis binary.
//! Reads ibdseq.toml from the current directory or the path in IBDSEQ_CONFIG.

use serde::{Deserialize, Serialize};
use std::path::Path;

use ibdseq_common::catalog::Catalog;
use ibdseq_stats::weights::{SimilarityWeights, TargetWeights};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3001 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON dataset export. Simulated fixtures are served when unset.
    #[serde(default)]
    pub dataset_path: Option<String>,
    /// YAML or JSON catalog. The built-in catalog is used when unset.
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Seed of the simulated fixtures
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_static_dir() -> String { "static".to_string() }
fn default_seed() -> u64 { 42 }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            catalog_path: None,
            static_dir: default_static_dir(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Human cohort mouse models are compared against
    #[serde(default = "default_reference_model")]
    pub reference_model: String,
    #[serde(default)]
    pub similarity: SimilarityWeights,
    #[serde(default)]
    pub targets: TargetWeights,
}

fn default_reference_model() -> String { "human_uc".to_string() }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            reference_model: default_reference_model(),
            similarity: SimilarityWeights::default(),
            targets: TargetWeights::default(),
        }
    }
}

mod tests;

impl Config {
    /// Load configuration from ibdseq.toml.
    /// Checks IBDSEQ_CONFIG env var first, then current directory.
    /// A missing file yields the defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("IBDSEQ_CONFIG")
            .unwrap_or_else(|_| "ibdseq.toml".to_string());

        if !Path::new(&path).exists() {
            tracing::warn!("Config file not found: {path}; using defaults");
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.scoring.similarity.validate()?;
        config.scoring.targets.validate()?;
        Ok(config)
    }

    /// Checks that depend on the catalog in use.
    pub fn validate_against(&self, catalog: &Catalog) -> anyhow::Result<()> {
        if catalog.model(&self.scoring.reference_model).is_none() {
            anyhow::bail!(
                "reference_model '{}' is not in the catalog (known: {})",
                self.scoring.reference_model,
                catalog.model_ids().join(", ")
            );
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
