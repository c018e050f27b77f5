//! Expression datasets and the data-source seam.
//!
//! The summarizer does not care whether a dataset came from a processed
//! count table or from the simulated fixture generator; anything that
//! implements [`DatasetSource`] will do.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use ibdseq_common::catalog::ModelSpec;
use ibdseq_common::error::{IbdSeqError, Result as IoResult};

use crate::correlation::ExpressionByModel;
use crate::describe::mean;
use crate::differential::{differential_expression, DifferentialExpressionRecord, PathwayObservation};
use crate::pca::LabeledSample;
use crate::scorer::TargetEvidence;
use crate::{Result, StatsError};

/// gene → model → condition → expression value.
pub type ExpressionTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: String,
    pub condition: String,
}

/// Per-sample expression of one disease model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDataset {
    pub model: String,
    pub samples: Vec<Sample>,
    /// gene → one value per sample, aligned with `samples`
    pub expression: BTreeMap<String, Vec<f64>>,
}

impl ModelDataset {
    /// Every vector must match the sample count and hold finite, non-negative values.
    pub fn validate(&self) -> Result<()> {
        let n = self.samples.len();
        for (gene, values) in &self.expression {
            if values.len() != n {
                return Err(StatsError::invalid(format!(
                    "{}: gene {gene} has {} values for {n} samples",
                    self.model,
                    values.len()
                )));
            }
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(StatsError::invalid(format!(
                    "{}: gene {gene} has a negative or non-finite value",
                    self.model
                )));
            }
        }
        Ok(())
    }

    /// Distinct condition labels in first-appearance order.
    pub fn conditions(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for s in &self.samples {
            if !seen.contains(&s.condition) {
                seen.push(s.condition.clone());
            }
        }
        seen
    }

    pub fn sample_indices(&self, condition: &str) -> Vec<usize> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.condition == condition)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of `condition`'s samples; a condition without samples is an error.
    fn require_samples(&self, condition: &str) -> Result<Vec<usize>> {
        let idx = self.sample_indices(condition);
        if idx.is_empty() {
            return Err(StatsError::insufficient(format!(
                "{}: no samples for condition {condition}",
                self.model
            )));
        }
        Ok(idx)
    }

    /// Values of one gene restricted to one condition. `None` for an unknown gene.
    pub fn gene_values(&self, gene: &str, condition: &str) -> Result<Option<Vec<f64>>> {
        let idx = self.require_samples(condition)?;
        Ok(self
            .expression
            .get(gene)
            .map(|values| idx.iter().map(|&i| values[i]).collect()))
    }

    /// Mean expression per gene within one condition.
    pub fn condition_means(&self, condition: &str) -> Result<BTreeMap<String, f64>> {
        let idx = self.require_samples(condition)?;
        Ok(self
            .expression
            .iter()
            .map(|(gene, values)| {
                let picked: Vec<f64> = idx.iter().map(|&i| values[i]).collect();
                (gene.clone(), mean(&picked))
            })
            .collect())
    }

    /// Mean expression per gene across all samples.
    pub fn mean_expression_by_gene(&self) -> HashMap<String, f64> {
        self.expression
            .iter()
            .map(|(gene, values)| (gene.clone(), mean(values)))
            .collect()
    }
}

/// Everything the web layer and the analysis binary summarize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisDataset {
    pub models: Vec<ModelDataset>,
    /// model → gene → p-value of the disease vs control comparison
    #[serde(default)]
    pub de_pvalues: BTreeMap<String, BTreeMap<String, f64>>,
    /// model → pathway enrichment observations
    #[serde(default)]
    pub pathways: BTreeMap<String, Vec<PathwayObservation>>,
    #[serde(default)]
    pub target_evidence: Vec<TargetEvidence>,
}

impl AnalysisDataset {
    pub fn validate(&self) -> Result<()> {
        for m in &self.models {
            m.validate()?;
        }
        Ok(())
    }

    pub fn model(&self, id: &str) -> Option<&ModelDataset> {
        self.models.iter().find(|m| m.model == id)
    }

    /// Disease vs control table for a catalog model.
    pub fn differential_expression_for(&self, spec: &ModelSpec) -> Result<Vec<DifferentialExpressionRecord>> {
        let data = self
            .model(&spec.id)
            .ok_or_else(|| StatsError::insufficient(format!("no expression data for model {}", spec.id)))?;
        let pvalues = self
            .de_pvalues
            .get(&spec.id)
            .ok_or_else(|| StatsError::insufficient(format!("no p-values for model {}", spec.id)))?;
        differential_expression(data, &spec.control_condition, &spec.disease_condition, pvalues)
    }

    /// Per-model mean expression, the input of the correlation matrix.
    pub fn expression_by_model(&self) -> ExpressionByModel {
        self.models
            .iter()
            .map(|m| (m.model.clone(), m.mean_expression_by_gene()))
            .collect()
    }

    /// Collapse per-sample data into a gene → model → condition → mean table.
    pub fn condition_mean_table(&self) -> Result<ExpressionTable> {
        let mut table = ExpressionTable::new();
        for m in &self.models {
            for condition in m.conditions() {
                for (gene, value) in m.condition_means(&condition)? {
                    table
                        .entry(gene)
                        .or_default()
                        .entry(m.model.clone())
                        .or_default()
                        .insert(condition.clone(), value);
                }
            }
        }
        Ok(table)
    }
}

/// Condition-mean vectors of every model over the genes all models share,
/// labelled `<model>_<condition>`, in dataset order.
pub fn condition_mean_samples(models: &[ModelDataset]) -> Result<Vec<LabeledSample>> {
    let Some(first) = models.first() else {
        return Err(StatsError::insufficient("no models to project"));
    };
    let shared: Vec<&String> = first
        .expression
        .keys()
        .filter(|g| models.iter().all(|m| m.expression.contains_key(*g)))
        .collect();
    if shared.is_empty() {
        return Err(StatsError::insufficient("models share no genes"));
    }

    let mut samples = Vec::new();
    for m in models {
        for condition in m.conditions() {
            let means = m.condition_means(&condition)?;
            samples.push(LabeledSample {
                label: format!("{}_{}", m.model, condition),
                model: m.model.clone(),
                condition: condition.clone(),
                values: shared.iter().map(|g| means[*g]).collect(),
            });
        }
    }
    Ok(samples)
}

// ── Sources ───────────────────────────────────────────────────────────────────

/// Supplies the dataset a server or batch run summarizes.
///
/// Implementations can use:
/// - a JSON export of processed data (local)
/// - the seeded fixture generator (demo / testing)
pub trait DatasetSource: Send + Sync {
    /// Human-readable description for logs.
    fn describe(&self) -> String;

    fn load(&self) -> IoResult<AnalysisDataset>;
}

/// Reads an [`AnalysisDataset`] serialized as JSON.
pub struct JsonDatasetSource {
    path: PathBuf,
}

impl JsonDatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for JsonDatasetSource {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn load(&self) -> IoResult<AnalysisDataset> {
        let content = std::fs::read_to_string(&self.path)?;
        let dataset: AnalysisDataset = serde_json::from_str(&content)?;
        dataset.validate().map_err(IbdSeqError::from)?;
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_model(id: &str, control: &str, disease: &str) -> ModelDataset {
        let samples = vec![
            Sample { id: format!("{id}_1"), condition: control.to_string() },
            Sample { id: format!("{id}_2"), condition: disease.to_string() },
            Sample { id: format!("{id}_3"), condition: control.to_string() },
            Sample { id: format!("{id}_4"), condition: disease.to_string() },
        ];
        let mut expression = BTreeMap::new();
        expression.insert("TNF".to_string(), vec![10.0, 40.0, 12.0, 44.0]);
        expression.insert("IL10".to_string(), vec![25.0, 10.0, 27.0, 12.0]);
        expression.insert("MUC2".to_string(), vec![100.0, 40.0, 110.0, 30.0]);
        ModelDataset { model: id.to_string(), samples, expression }
    }

    #[test]
    fn test_condition_means() {
        let m = toy_model("acute_dss", "Control", "DSS");
        let means = m.condition_means("DSS").unwrap();
        assert_eq!(means["TNF"], 42.0);
        assert_eq!(m.conditions(), vec!["Control".to_string(), "DSS".to_string()]);
        assert!(matches!(m.condition_means("Week6"), Err(StatsError::InsufficientData(_))));
    }

    #[test]
    fn test_gene_values_need_condition_samples() {
        let m = toy_model("acute_dss", "Control", "DSS");
        assert_eq!(m.gene_values("TNF", "DSS").unwrap(), Some(vec![40.0, 44.0]));
        assert_eq!(m.gene_values("FOXP3", "DSS").unwrap(), None);
        assert!(matches!(m.gene_values("TNF", "Week6"), Err(StatsError::InsufficientData(_))));
    }

    #[test]
    fn test_validate_catches_ragged_rows() {
        let mut m = toy_model("il10ko", "WT", "IL10KO");
        m.expression.insert("IL6".to_string(), vec![1.0]);
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_condition_mean_samples_use_shared_genes() {
        let a = toy_model("acute_dss", "Control", "DSS");
        let mut b = toy_model("human_uc", "Control", "UC");
        b.expression.remove("MUC2");
        let samples = condition_mean_samples(&[a, b]).unwrap();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0].label, "acute_dss_Control");
        assert_eq!(samples[3].label, "human_uc_UC");
        // shared genes are IL10, TNF (sorted)
        assert_eq!(samples[1].values, vec![11.0, 42.0]);
    }

    #[test]
    fn test_condition_mean_table() {
        let ds = AnalysisDataset {
            models: vec![toy_model("acute_dss", "Control", "DSS")],
            ..Default::default()
        };
        let table = ds.condition_mean_table().unwrap();
        assert_eq!(table["TNF"]["acute_dss"]["Control"], 11.0);
    }

    #[test]
    fn test_json_source_roundtrip() {
        let ds = AnalysisDataset {
            models: vec![toy_model("acute_dss", "Control", "DSS")],
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        std::fs::write(&path, serde_json::to_string(&ds).unwrap()).unwrap();
        let loaded = JsonDatasetSource::new(&path).load().unwrap();
        assert_eq!(loaded.models, ds.models);
    }
}
