//! Disease-model, pathway and gene catalog.
//!
//! The website ships with six IBD models and ten immune pathways, but nothing
//! downstream depends on those literals: a catalog can be loaded from YAML or
//! JSON and handed to the server or the analysis binary.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{IbdSeqError, Result};

/// Complete catalog supplied by the data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Disease models, in display order
    #[serde(default = "default_models")]
    pub models: Vec<ModelSpec>,

    /// Pathway vocabulary for enrichment tables
    #[serde(default = "default_pathways")]
    pub pathways: Vec<String>,

    /// Gene symbols offered by the search box
    #[serde(default = "default_genes")]
    pub genes: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            models: default_models(),
            pathways: default_pathways(),
            genes: default_genes(),
        }
    }
}

// ── Models ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Mouse,
    Human,
}

/// One disease model and its two-condition comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Short identifier used in URLs (e.g., "acute_dss")
    pub id: String,

    /// Display name (e.g., "Acute DSS")
    pub name: String,

    pub species: Species,

    /// Baseline condition label (e.g., "Control", "WT")
    pub control_condition: String,

    /// Disease condition label (e.g., "DSS", "IL10KO")
    pub disease_condition: String,
}

impl ModelSpec {
    fn new(id: &str, name: &str, species: Species, control: &str, disease: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            species,
            control_condition: control.to_string(),
            disease_condition: disease.to_string(),
        }
    }

    /// Comparison label used for output files, e.g. `acute_dss_DSS_vs_Control`.
    pub fn comparison_name(&self) -> String {
        format!("{}_{}_vs_{}", self.id, self.disease_condition, self.control_condition)
    }
}

fn default_models() -> Vec<ModelSpec> {
    vec![
        ModelSpec::new("cd45rb",      "CD45RBHigh T cell", Species::Mouse, "Control", "Week6"),
        ModelSpec::new("acute_dss",   "Acute DSS",         Species::Mouse, "Control", "DSS"),
        ModelSpec::new("chronic_dss", "Chronic DSS",       Species::Mouse, "Control", "Chronic_DSS"),
        ModelSpec::new("il10ko",      "IL-10KO",           Species::Mouse, "WT",      "IL10KO"),
        ModelSpec::new("human_uc",    "Human UC",          Species::Human, "Control", "UC"),
        ModelSpec::new("human_cd",    "Human CD",          Species::Human, "Control", "CD"),
    ]
}

fn default_pathways() -> Vec<String> {
    [
        "Inflammatory response",
        "Cytokine signaling",
        "T cell activation",
        "B cell receptor signaling",
        "NF-kB signaling",
        "TNF signaling",
        "IL-17 signaling",
        "Toll-like receptor signaling",
        "JAK-STAT signaling",
        "MAPK signaling",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_genes() -> Vec<String> {
    [
        "IL1B", "TNF", "IL6", "IL17A", "IFNG", "FOXP3", "RORC", "TBX21", "GATA3", "IL10",
        "IL23A", "IL12B", "TGFB1", "STAT3", "STAT1", "NFKB1", "RELA", "MAPK1", "MAPK3", "JAK1",
        "JAK2", "TLR4", "TLR2", "MYD88", "NLRP3", "IL18", "IL1A", "IL4", "IL5", "IL13",
        "CCL2", "CCL5", "CXCL8", "CXCL10", "CCR2", "CCR5", "CXCR3", "CD4", "CD8A", "CD19",
        "CD3E", "CD14", "CD68", "ITGAM", "ITGAX", "PTGS2", "NOS2", "ARG1", "MRC1", "IL1RN",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ── Helper Methods ─────────────────────────────────────────────────────────────

impl Catalog {
    /// Load from YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog: Self = serde_yaml::from_str(&content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load from JSON file
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load by file extension (`.yaml`/`.yml` or `.json`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            Some("json") => Self::from_json(path),
            _ => Err(IbdSeqError::Config(format!(
                "unsupported catalog format: {}",
                path.display()
            ))),
        }
    }

    /// Model ids must be unique and each model needs two distinct conditions.
    pub fn validate(&self) -> Result<()> {
        for (i, model) in self.models.iter().enumerate() {
            if self.models[..i].iter().any(|m| m.id == model.id) {
                return Err(IbdSeqError::Config(format!("duplicate model id: {}", model.id)));
            }
            if model.control_condition == model.disease_condition {
                return Err(IbdSeqError::Config(format!(
                    "model {} uses the same label for control and disease",
                    model.id
                )));
            }
        }
        Ok(())
    }

    pub fn model(&self, id: &str) -> Option<&ModelSpec> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Like [`Catalog::model`] but fails with `UnknownModel`.
    pub fn require_model(&self, id: &str) -> Result<&ModelSpec> {
        self.model(id)
            .ok_or_else(|| IbdSeqError::UnknownModel(id.to_string()))
    }

    pub fn model_ids(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.id.as_str()).collect()
    }

    /// Case-insensitive substring search over the gene list.
    /// An empty query returns the head of the list.
    pub fn search_genes(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.trim().to_uppercase();
        self.genes
            .iter()
            .filter(|g| needle.is_empty() || g.to_uppercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.models.len(), 6);
        assert_eq!(catalog.pathways.len(), 10);
        assert_eq!(catalog.genes.len(), 50);
        assert!(catalog.validate().is_ok());
        let il10ko = catalog.model("il10ko").unwrap();
        assert_eq!(il10ko.control_condition, "WT");
        assert_eq!(il10ko.comparison_name(), "il10ko_IL10KO_vs_WT");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::default();
        let hits = catalog.search_genes("stat", 10);
        assert_eq!(hits, vec!["STAT3".to_string(), "STAT1".to_string()]);
    }

    #[test]
    fn test_search_caps_results() {
        let catalog = Catalog::default();
        assert_eq!(catalog.search_genes("", 10).len(), 10);
        assert_eq!(catalog.search_genes("IL", 10).len(), 10);
        assert!(catalog.search_genes("XYZ", 10).is_empty());
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let mut catalog = Catalog::default();
        catalog.models.push(catalog.models[0].clone());
        assert!(matches!(catalog.validate(), Err(IbdSeqError::Config(_))));
    }

    #[test]
    fn test_require_unknown_model() {
        let catalog = Catalog::default();
        assert!(matches!(
            catalog.require_model("rat_tnbs"),
            Err(IbdSeqError::UnknownModel(_))
        ));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let catalog = Catalog::default();
        let yaml = serde_yaml::to_string(&catalog).unwrap();
        let parsed: Catalog = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(catalog.models, parsed.models);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "pathways: [\"Autophagy\"]\n";
        let parsed: Catalog = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.pathways, vec!["Autophagy".to_string()]);
        assert_eq!(parsed.models.len(), 6);
    }
}
