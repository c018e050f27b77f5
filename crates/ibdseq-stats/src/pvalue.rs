//! p-value helpers.
//!
//! `adjust_p_value` is a fixed ×1.5 multiplier capped at 1. It is not a
//! multiple-testing correction; it is kept as the documented placeholder the
//! website has always shown in its `padj` columns.

use crate::{Result, StatsError};

/// Significance cut-off used for volcano points and overlap sets.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Multiplier applied by [`adjust_p_value`].
pub const ADJUSTMENT_FACTOR: f64 = 1.5;

pub fn validate_p_value(p: f64) -> Result<f64> {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Err(StatsError::invalid(format!("p-value {p} outside [0, 1]")));
    }
    Ok(p)
}

/// min(p × 1.5, 1.0) for p in [0, 1].
pub fn adjust_p_value(p: f64) -> Result<f64> {
    let p = validate_p_value(p)?;
    Ok((p * ADJUSTMENT_FACTOR).min(1.0))
}

pub fn is_significant(p: f64) -> bool {
    p < SIGNIFICANCE_THRESHOLD
}
