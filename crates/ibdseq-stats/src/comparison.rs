//! Mouse model vs human reference comparison.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use ibdseq_common::catalog::{Catalog, Species};

use crate::correlation::{paired_by_gene, pearson};
use crate::dataset::AnalysisDataset;
use crate::differential::{rank_pathways, significant_genes, significant_pathways, DifferentialExpressionRecord};
use crate::scorer::{compute_model_similarity, ModelSimilarityScore};
use crate::weights::SimilarityWeights;
use crate::{Result, StatsError};

/// |A ∩ B| / |A ∪ B|; two empty sets score 0.0.
pub fn jaccard_index(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn lfc_by_gene(records: &[DifferentialExpressionRecord]) -> HashMap<String, f64> {
    records.iter().map(|r| (r.gene.clone(), r.log2_fold_change)).collect()
}

fn pathway_set(dataset: &AnalysisDataset, model: &str) -> Result<BTreeSet<String>> {
    match dataset.pathways.get(model) {
        Some(obs) => Ok(significant_pathways(&rank_pathways(obs)?)),
        None => Ok(BTreeSet::new()),
    }
}

/// Score every mouse model against `reference_model`, best first.
///
/// The correlation component is Pearson over the log2 fold changes of the
/// genes both DE tables share. Mouse models without data are skipped.
pub fn compare_models(
    catalog: &Catalog,
    dataset: &AnalysisDataset,
    reference_model: &str,
    weights: &SimilarityWeights,
) -> Result<Vec<ModelSimilarityScore>> {
    weights.validate()?;
    let reference = catalog
        .model(reference_model)
        .ok_or_else(|| StatsError::invalid(format!("unknown reference model {reference_model}")))?;
    let ref_de = dataset.differential_expression_for(reference)?;
    let ref_lfc = lfc_by_gene(&ref_de);
    let ref_genes = significant_genes(&ref_de);
    let ref_pathways = pathway_set(dataset, &reference.id)?;

    let mut scores = Vec::new();
    for spec in catalog.models.iter().filter(|m| m.species == Species::Mouse && m.id != reference.id) {
        if dataset.model(&spec.id).is_none() {
            continue;
        }
        let de = dataset.differential_expression_for(spec)?;
        let (_, x, y) = paired_by_gene(&lfc_by_gene(&de), &ref_lfc);
        let correlation = pearson(&x, &y)
            .map_err(|e| e.context(format!("{} vs {}", spec.id, reference.id)))?;

        scores.push(compute_model_similarity(
            &spec.id,
            correlation,
            jaccard_index(&pathway_set(dataset, &spec.id)?, &ref_pathways),
            jaccard_index(&significant_genes(&de), &ref_genes),
            weights,
        )?);
    }

    scores.sort_by(|a, b| {
        b.overall_score
            .partial_cmp(&a.overall_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.model.cmp(&b.model))
    });
    Ok(scores)
}
