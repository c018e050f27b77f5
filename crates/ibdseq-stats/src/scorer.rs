//! Composite weighted scores.
//!
//! overall(model) = Σ w_i × s_i over (correlation, pathway overlap, DE overlap)
//! overall(gene)  = Σ w_i × s_i over (DE, pathway relevance, conservation, druggability)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::weights::{SimilarityWeights, TargetWeights};
use crate::{Result, StatsError};

fn weighted_sum(components: &[f64], weights: &[f64]) -> f64 {
    components
        .iter()
        .zip(weights.iter())
        .map(|(s, w)| s * w)
        .sum()
}

fn check_finite(what: &str, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::invalid(format!("{what} component scores must be finite")));
    }
    Ok(())
}

/// Mouse model similarity to human IBD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSimilarityScore {
    pub model: String,
    pub gene_expression_correlation: f64,
    pub pathway_overlap_score: f64,
    pub de_gene_overlap: f64,
    pub overall_score: f64,
}

pub fn compute_model_similarity(
    model: &str,
    correlation: f64,
    pathway_overlap: f64,
    de_overlap: f64,
    weights: &SimilarityWeights,
) -> Result<ModelSimilarityScore> {
    weights.validate()?;
    let components = [correlation, pathway_overlap, de_overlap];
    check_finite(model, &components)?;

    Ok(ModelSimilarityScore {
        model: model.to_string(),
        gene_expression_correlation: correlation,
        pathway_overlap_score: pathway_overlap,
        de_gene_overlap: de_overlap,
        overall_score: weighted_sum(&components, &weights.as_array()),
    })
}

/// Per-gene evidence supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetEvidence {
    pub gene: String,
    pub differential_expression_score: f64,
    pub pathway_relevance_score: f64,
    pub conservation_score: f64,
    pub druggability_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetScore {
    pub gene: String,
    pub differential_expression_score: f64,
    pub pathway_relevance_score: f64,
    pub conservation_score: f64,
    pub druggability_score: f64,
    pub overall_score: f64,
}

pub fn compute_target_score(
    gene: &str,
    de_score: f64,
    pathway_score: f64,
    conservation_score: f64,
    druggability_score: f64,
    weights: &TargetWeights,
) -> Result<TargetScore> {
    weights.validate()?;
    let components = [de_score, pathway_score, conservation_score, druggability_score];
    check_finite(gene, &components)?;

    Ok(TargetScore {
        gene: gene.to_string(),
        differential_expression_score: de_score,
        pathway_relevance_score: pathway_score,
        conservation_score,
        druggability_score,
        overall_score: weighted_sum(&components, &weights.as_array()),
    })
}

/// Score every candidate and sort by overall score, best first.
/// Ties keep gene-id order.
pub fn rank_targets(evidence: &[TargetEvidence], weights: &TargetWeights) -> Result<Vec<TargetScore>> {
    let mut scores = evidence
        .iter()
        .map(|e| {
            compute_target_score(
                &e.gene,
                e.differential_expression_score,
                e.pathway_relevance_score,
                e.conservation_score,
                e.druggability_score,
                weights,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    scores.sort_by(|a, b| {
        b.overall_score
            .partial_cmp(&a.overall_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.gene.cmp(&b.gene))
    });
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_similarity_example() {
        let s = compute_model_similarity("cd45rb", 0.72, 0.68, 0.65, &SimilarityWeights::default()).unwrap();
        assert!((s.overall_score - 0.69).abs() < 1e-9);
        assert_eq!(s.model, "cd45rb");
    }

    #[test]
    fn test_target_score_formula() {
        let t = compute_target_score("TNF", 0.95, 0.90, 0.98, 0.88, &TargetWeights::default()).unwrap();
        let expected = 0.3 * 0.95 + 0.3 * 0.90 + 0.2 * 0.98 + 0.2 * 0.88;
        assert!((t.overall_score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = SimilarityWeights { gene_expression_correlation: 0.5, ..Default::default() };
        assert!(compute_model_similarity("il10ko", 0.7, 0.7, 0.7, &weights).is_err());
    }

    #[test]
    fn test_non_finite_component_rejected() {
        let res = compute_target_score("IL6", f64::NAN, 0.5, 0.5, 0.5, &TargetWeights::default());
        assert!(matches!(res, Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_rank_targets_descending() {
        let evidence = vec![
            TargetEvidence {
                gene: "GATA3".into(),
                differential_expression_score: 0.75,
                pathway_relevance_score: 0.72,
                conservation_score: 0.84,
                druggability_score: 0.60,
            },
            TargetEvidence {
                gene: "TNF".into(),
                differential_expression_score: 0.95,
                pathway_relevance_score: 0.90,
                conservation_score: 0.98,
                druggability_score: 0.88,
            },
        ];
        let ranked = rank_targets(&evidence, &TargetWeights::default()).unwrap();
        assert_eq!(ranked[0].gene, "TNF");
        assert!(ranked[0].overall_score >= ranked[1].overall_score);
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let s = compute_model_similarity("acute_dss", 0.58, 0.62, 0.53, &SimilarityWeights::default()).unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("geneExpressionCorrelation").is_some());
        assert!(json.get("overallScore").is_some());
    }
}
