//! Agreement between observed fold changes and a reference table.
//!
//! Both inputs are gene → model → condition → value tables. A (gene, model)
//! pair is scored only when both tables carry the model's control and
//! disease values for that gene.

use serde::{Deserialize, Serialize};

use ibdseq_common::catalog::ModelSpec;

use crate::correlation::{pearson, spearman};
use crate::dataset::ExpressionTable;
use crate::describe::{mean, median};
use crate::fold_change::{compute_fold_change, FoldChange};
use crate::{Result, StatsError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcordanceEntry {
    pub gene: String,
    pub model: String,
    pub reference_fold_change: f64,
    pub observed_fold_change: f64,
    pub absolute_error: f64,
    /// None when the reference fold change is 0
    pub relative_error: Option<f64>,
    pub direction_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcordanceReport {
    pub pairs: usize,
    pub mean_absolute_error: f64,
    pub median_absolute_error: f64,
    pub mean_relative_error: Option<f64>,
    pub median_relative_error: Option<f64>,
    /// Fraction of pairs whose up/down direction agrees
    pub direction_accuracy: f64,
    pub pearson: f64,
    pub spearman: f64,
    pub entries: Vec<ConcordanceEntry>,
}

fn fold_change_of(table: &ExpressionTable, gene: &str, spec: &ModelSpec) -> Option<Result<FoldChange>> {
    let conditions = table.get(gene)?.get(&spec.id)?;
    let control = *conditions.get(&spec.control_condition)?;
    let disease = *conditions.get(&spec.disease_condition)?;
    Some(compute_fold_change(control, disease).map_err(|e| e.context(format!("{gene}/{}", spec.id))))
}

pub fn fold_change_concordance(
    reference: &ExpressionTable,
    observed: &ExpressionTable,
    models: &[ModelSpec],
) -> Result<ConcordanceReport> {
    let mut entries = Vec::new();
    for gene in reference.keys() {
        for spec in models {
            let (Some(r), Some(o)) = (fold_change_of(reference, gene, spec), fold_change_of(observed, gene, spec))
            else {
                continue;
            };
            let (r, o) = (r?, o?);
            let absolute_error = (o.value - r.value).abs();
            entries.push(ConcordanceEntry {
                gene: gene.clone(),
                model: spec.id.clone(),
                reference_fold_change: r.value,
                observed_fold_change: o.value,
                absolute_error,
                relative_error: (r.value != 0.0).then(|| absolute_error / r.value),
                direction_match: r.direction == o.direction,
            });
        }
    }
    if entries.is_empty() {
        return Err(StatsError::insufficient("no (gene, model) pair present in both tables"));
    }

    let abs: Vec<f64> = entries.iter().map(|e| e.absolute_error).collect();
    let rel: Vec<f64> = entries.iter().filter_map(|e| e.relative_error).collect();
    let ref_fc: Vec<f64> = entries.iter().map(|e| e.reference_fold_change).collect();
    let obs_fc: Vec<f64> = entries.iter().map(|e| e.observed_fold_change).collect();
    let matches = entries.iter().filter(|e| e.direction_match).count();

    Ok(ConcordanceReport {
        pairs: entries.len(),
        mean_absolute_error: mean(&abs),
        median_absolute_error: median(&abs),
        mean_relative_error: (!rel.is_empty()).then(|| mean(&rel)),
        median_relative_error: (!rel.is_empty()).then(|| median(&rel)),
        direction_accuracy: matches as f64 / entries.len() as f64,
        pearson: pearson(&ref_fc, &obs_fc)?,
        spearman: spearman(&ref_fc, &obs_fc)?,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ibdseq_common::catalog::Catalog;

    fn table(rows: &[(&str, &str, &str, f64)]) -> ExpressionTable {
        let mut t = ExpressionTable::new();
        for (gene, model, condition, value) in rows {
            t.entry(gene.to_string())
                .or_default()
                .entry(model.to_string())
                .or_default()
                .insert(condition.to_string(), *value);
        }
        t
    }

    fn reference() -> ExpressionTable {
        table(&[
            ("TNF", "acute_dss", "Control", 10.0),
            ("TNF", "acute_dss", "DSS", 40.0),
            ("IL10", "il10ko", "WT", 20.0),
            ("IL10", "il10ko", "IL10KO", 0.0),
            ("MUC2", "acute_dss", "Control", 100.0),
            ("MUC2", "acute_dss", "DSS", 50.0),
        ])
    }

    #[test]
    fn test_identical_tables_agree() {
        let report = fold_change_concordance(&reference(), &reference(), &Catalog::default().models).unwrap();
        assert_eq!(report.pairs, 3);
        assert_eq!(report.mean_absolute_error, 0.0);
        assert_eq!(report.median_relative_error, Some(0.0));
        assert_eq!(report.direction_accuracy, 1.0);
        assert!((report.pearson - 1.0).abs() < 1e-12);
        assert!((report.spearman - 1.0).abs() < 1e-12);
        // IL10 knock-out has a zero reference fold change
        let il10 = report.entries.iter().find(|e| e.gene == "IL10").unwrap();
        assert_eq!(il10.relative_error, None);
    }

    #[test]
    fn test_errors_and_direction() {
        let observed = table(&[
            ("TNF", "acute_dss", "Control", 10.0),
            ("TNF", "acute_dss", "DSS", 30.0),
            ("IL10", "il10ko", "WT", 20.0),
            ("IL10", "il10ko", "IL10KO", 1.0),
            ("MUC2", "acute_dss", "Control", 100.0),
            ("MUC2", "acute_dss", "DSS", 150.0),
        ]);
        let report = fold_change_concordance(&reference(), &observed, &Catalog::default().models).unwrap();
        let tnf = report.entries.iter().find(|e| e.gene == "TNF").unwrap();
        assert_eq!(tnf.absolute_error, 1.0);
        assert_eq!(tnf.relative_error, Some(0.25));
        assert!((report.direction_accuracy - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_control_surfaces() {
        let bad = table(&[("TNF", "acute_dss", "Control", 0.0), ("TNF", "acute_dss", "DSS", 4.0)]);
        let res = fold_change_concordance(&bad, &bad, &Catalog::default().models);
        assert!(matches!(res, Err(StatsError::DivisionByZero(_))));
    }

    #[test]
    fn test_no_overlap_is_insufficient() {
        let res = fold_change_concordance(&reference(), &ExpressionTable::new(), &Catalog::default().models);
        assert!(matches!(res, Err(StatsError::InsufficientData(_))));
    }
}
