//! Differential-expression and pathway-enrichment tables.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::ModelDataset;
use crate::fold_change::log2_fold_change;
use crate::pvalue::{adjust_p_value, validate_p_value, SIGNIFICANCE_THRESHOLD};
use crate::{Result, StatsError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifferentialExpressionRecord {
    pub gene: String,
    pub log2_fold_change: f64,
    pub pvalue: f64,
    pub padj: f64,
    pub base_mean: f64,
}

fn by_padj(a_padj: f64, a_key: &str, b_padj: f64, b_key: &str) -> Ordering {
    a_padj
        .partial_cmp(&b_padj)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_key.cmp(b_key))
}

/// One DE row per gene from the disease vs control condition means.
///
/// Genes with no entry in `pvalues` are left out. Rows are sorted by
/// `padj` ascending, then by gene id.
pub fn differential_expression(
    dataset: &ModelDataset,
    control: &str,
    disease: &str,
    pvalues: &BTreeMap<String, f64>,
) -> Result<Vec<DifferentialExpressionRecord>> {
    let control_means = dataset.condition_means(control)?;
    let disease_means = dataset.condition_means(disease)?;

    let mut records = Vec::with_capacity(control_means.len());
    for (gene, mean_a) in &control_means {
        let Some(&pvalue) = pvalues.get(gene) else {
            continue;
        };
        let mean_b = disease_means[gene];
        let pvalue = validate_p_value(pvalue)
            .map_err(|e| e.context(format!("{}/{gene}", dataset.model)))?;
        records.push(DifferentialExpressionRecord {
            gene: gene.clone(),
            log2_fold_change: log2_fold_change(*mean_a, mean_b),
            pvalue,
            padj: adjust_p_value(pvalue)?,
            base_mean: (mean_a + mean_b) / 2.0,
        });
    }

    records.sort_by(|a, b| by_padj(a.padj, &a.gene, b.padj, &b.gene));
    Ok(records)
}

/// Genes with `padj` below the significance threshold.
pub fn significant_genes(records: &[DifferentialExpressionRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| r.padj < SIGNIFICANCE_THRESHOLD)
        .map(|r| r.gene.clone())
        .collect()
}

// ── Pathways ──────────────────────────────────────────────────────────────────

/// Raw enrichment result as supplied by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayObservation {
    pub pathway: String,
    pub pvalue: f64,
    pub gene_count: u32,
    pub enrichment_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayRecord {
    pub pathway: String,
    pub pvalue: f64,
    pub gene_count: u32,
    pub enrichment_score: f64,
    pub padj: f64,
}

impl PathwayRecord {
    pub fn new(pathway: &str, pvalue: f64, gene_count: u32, enrichment_score: f64) -> Result<Self> {
        if !enrichment_score.is_finite() {
            return Err(StatsError::invalid(format!("enrichment score for {pathway} must be finite")));
        }
        Ok(Self {
            pathway: pathway.to_string(),
            pvalue,
            gene_count,
            enrichment_score,
            padj: adjust_p_value(pvalue)?,
        })
    }
}

/// Adjust every observation and order by `padj`, then pathway name.
pub fn rank_pathways(observations: &[PathwayObservation]) -> Result<Vec<PathwayRecord>> {
    let mut records = observations
        .iter()
        .map(|o| PathwayRecord::new(&o.pathway, o.pvalue, o.gene_count, o.enrichment_score))
        .collect::<Result<Vec<_>>>()?;
    records.sort_by(|a, b| by_padj(a.padj, &a.pathway, b.padj, &b.pathway));
    Ok(records)
}

pub fn significant_pathways(records: &[PathwayRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| r.padj < SIGNIFICANCE_THRESHOLD)
        .map(|r| r.pathway.clone())
        .collect()
}
