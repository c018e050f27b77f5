//! Weight vectors for the composite model-similarity and target scores.

use serde::{Deserialize, Serialize};

use crate::{Result, StatsError};

const WEIGHT_TOLERANCE: f64 = 1e-6;

fn check_sum(name: &str, weights: &[f64]) -> Result<()> {
    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err(StatsError::invalid(format!("{name} weights must be finite and non-negative")));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(StatsError::invalid(format!("{name} weights sum to {sum}, expected 1.0")));
    }
    Ok(())
}

/// Weights of the mouse-model vs human similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityWeights {
    /// Correlation of log2 fold changes with the human reference
    pub gene_expression_correlation: f64,
    /// Overlap of significant pathways
    pub pathway_overlap: f64,
    /// Overlap of significant DE genes
    pub de_gene_overlap: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            gene_expression_correlation: 0.4,
            pathway_overlap:             0.4,
            de_gene_overlap:             0.2,
        }
    }
}

impl SimilarityWeights {
    /// Weights must be non-negative and sum to 1.0.
    pub fn validate(&self) -> Result<()> {
        check_sum("similarity", &self.as_array())
    }

    pub fn as_array(&self) -> [f64; 3] {
        [
            self.gene_expression_correlation,
            self.pathway_overlap,
            self.de_gene_overlap,
        ]
    }
}

/// Weights of the target-validation score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetWeights {
    pub differential_expression: f64,
    pub pathway_relevance: f64,
    /// Mouse/human conservation
    pub conservation: f64,
    pub druggability: f64,
}

impl Default for TargetWeights {
    fn default() -> Self {
        Self {
            differential_expression: 0.3,
            pathway_relevance:       0.3,
            conservation:            0.2,
            druggability:            0.2,
        }
    }
}

impl TargetWeights {
    pub fn validate(&self) -> Result<()> {
        check_sum("target", &self.as_array())
    }

    pub fn as_array(&self) -> [f64; 4] {
        [
            self.differential_expression,
            self.pathway_relevance,
            self.conservation,
            self.druggability,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!(SimilarityWeights::default().validate().is_ok());
        assert!(TargetWeights::default().validate().is_ok());
    }

    #[test]
    fn test_broken_sum_rejected() {
        let mut w = TargetWeights::default();
        w.druggability += 0.10; // deliberately break sum
        assert!(matches!(w.validate(), Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let w = SimilarityWeights {
            gene_expression_correlation: 1.2,
            pathway_overlap: -0.2,
            de_gene_overlap: 0.0,
        };
        assert!(w.validate().is_err());
    }
}
