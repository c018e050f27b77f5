//! Volcano-plot categorization of differential-expression rows.

use serde::{Deserialize, Serialize};

use crate::differential::DifferentialExpressionRecord;
use crate::pvalue::{is_significant, validate_p_value};
use crate::{Result, StatsError};

/// Fixed log2 fold-change bins. Bins are right-inclusive, so a boundary
/// value belongs to the lower-labelled bin (−2 is Strong Down, 1 is No Change).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoldChangeCategory {
    #[serde(rename = "Strong Down")]
    StrongDown,
    #[serde(rename = "Moderate Down")]
    ModerateDown,
    #[serde(rename = "No Change")]
    NoChange,
    #[serde(rename = "Moderate Up")]
    ModerateUp,
    #[serde(rename = "Strong Up")]
    StrongUp,
}

impl FoldChangeCategory {
    pub fn from_log2_fold_change(lfc: f64) -> Self {
        if lfc <= -2.0 {
            FoldChangeCategory::StrongDown
        } else if lfc <= -1.0 {
            FoldChangeCategory::ModerateDown
        } else if lfc <= 1.0 {
            FoldChangeCategory::NoChange
        } else if lfc <= 2.0 {
            FoldChangeCategory::ModerateUp
        } else {
            FoldChangeCategory::StrongUp
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FoldChangeCategory::StrongDown   => "Strong Down",
            FoldChangeCategory::ModerateDown => "Moderate Down",
            FoldChangeCategory::NoChange     => "No Change",
            FoldChangeCategory::ModerateUp   => "Moderate Up",
            FoldChangeCategory::StrongUp     => "Strong Up",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolcanoPoint {
    pub gene: String,
    pub log2_fold_change: f64,
    pub pvalue: f64,
    pub neg_log10_pvalue: f64,
    pub significant: bool,
    pub fold_change_category: FoldChangeCategory,
}

/// Build one volcano point. A p-value of exactly 0 is plotted at
/// −log10(f64::MIN_POSITIVE) rather than +∞.
pub fn categorize_volcano_point(gene: &str, log2_fold_change: f64, pvalue: f64) -> Result<VolcanoPoint> {
    if log2_fold_change.is_nan() {
        return Err(StatsError::invalid(format!("log2 fold change for {gene} is NaN")));
    }
    let pvalue = validate_p_value(pvalue)?;
    let neg_log10_pvalue = -pvalue.max(f64::MIN_POSITIVE).log10();

    Ok(VolcanoPoint {
        gene: gene.to_string(),
        log2_fold_change,
        pvalue,
        neg_log10_pvalue,
        significant: is_significant(pvalue),
        fold_change_category: FoldChangeCategory::from_log2_fold_change(log2_fold_change),
    })
}

/// Categorize a whole differential-expression table, preserving its order.
pub fn volcano_points(records: &[DifferentialExpressionRecord]) -> Result<Vec<VolcanoPoint>> {
    records
        .iter()
        .map(|r| categorize_volcano_point(&r.gene, r.log2_fold_change, r.pvalue))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_boundaries() {
        use FoldChangeCategory::*;
        assert_eq!(FoldChangeCategory::from_log2_fold_change(-2.0), StrongDown);
        assert_eq!(FoldChangeCategory::from_log2_fold_change(-1.0), ModerateDown);
        assert_eq!(FoldChangeCategory::from_log2_fold_change(1.0), NoChange);
        assert_eq!(FoldChangeCategory::from_log2_fold_change(2.0), ModerateUp);
        assert_eq!(FoldChangeCategory::from_log2_fold_change(2.0001), StrongUp);
        assert_eq!(FoldChangeCategory::from_log2_fold_change(-1.5), ModerateDown);
        assert_eq!(FoldChangeCategory::from_log2_fold_change(0.0), NoChange);
        assert_eq!(FoldChangeCategory::from_log2_fold_change(f64::NEG_INFINITY), StrongDown);
    }

    #[test]
    fn test_significance_threshold_is_strict() {
        let p = categorize_volcano_point("TNF", 2.5, 0.05).unwrap();
        assert!(!p.significant);
        let p = categorize_volcano_point("TNF", 2.5, 0.0499).unwrap();
        assert!(p.significant);
        assert_eq!(p.fold_change_category, FoldChangeCategory::StrongUp);
        assert!((p.neg_log10_pvalue - 1.30190).abs() < 1e-4);
    }

    #[test]
    fn test_zero_pvalue_stays_finite() {
        let p = categorize_volcano_point("IL6", -3.0, 0.0).unwrap();
        assert!(p.neg_log10_pvalue.is_finite());
        assert!(p.neg_log10_pvalue > 300.0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(categorize_volcano_point("IL6", f64::NAN, 0.1).is_err());
        assert!(categorize_volcano_point("IL6", 1.0, 1.5).is_err());
    }

    #[test]
    fn test_category_json_labels() {
        let json = serde_json::to_string(&FoldChangeCategory::ModerateDown).unwrap();
        assert_eq!(json, "\"Moderate Down\"");
        assert_eq!(FoldChangeCategory::StrongUp.label(), "Strong Up");
    }
}
