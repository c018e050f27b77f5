//! Fold-change arithmetic between a control and a disease condition.

use serde::{Deserialize, Serialize};

use crate::{Result, StatsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `Up` iff the ratio is strictly greater than 1; a ratio of exactly 1 is `Down`.
    pub fn of_ratio(ratio: f64) -> Self {
        if ratio > 1.0 { Direction::Up } else { Direction::Down }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldChange {
    pub value: f64,
    pub direction: Direction,
}

/// disease / control.
///
/// Fails with `DivisionByZero` when `control == 0` and with `InvalidInput`
/// for negative or non-finite values; no infinity or NaN is ever returned.
pub fn compute_fold_change(control: f64, disease: f64) -> Result<FoldChange> {
    if !control.is_finite() || !disease.is_finite() {
        return Err(StatsError::invalid(format!(
            "expression values must be finite (control={control}, disease={disease})"
        )));
    }
    if control < 0.0 || disease < 0.0 {
        return Err(StatsError::invalid(format!(
            "expression values must be non-negative (control={control}, disease={disease})"
        )));
    }
    if control == 0.0 {
        return Err(StatsError::DivisionByZero(format!(
            "control value is zero (disease={disease})"
        )));
    }
    let value = disease / control;
    Ok(FoldChange { value, direction: Direction::of_ratio(value) })
}

/// log2(mean_b + 1) − log2(mean_a + 1). The pseudo-count keeps zero means finite.
pub fn log2_fold_change(mean_a: f64, mean_b: f64) -> f64 {
    (mean_b + 1.0).log2() - (mean_a + 1.0).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_change_up() {
        let fc = compute_fold_change(10.0, 40.0).unwrap();
        assert_eq!(fc.value, 4.0);
        assert_eq!(fc.direction, Direction::Up);
    }

    #[test]
    fn test_fold_change_exactly_one_is_down() {
        let fc = compute_fold_change(25.0, 25.0).unwrap();
        assert_eq!(fc.value, 1.0);
        assert_eq!(fc.direction, Direction::Down);
    }

    #[test]
    fn test_fold_change_matches_ratio() {
        for &(c, d) in &[(1.0, 0.0), (0.5, 3.0), (30.0, 10.0), (120.0, 50.0), (7.0, 7.5)] {
            let fc = compute_fold_change(c, d).unwrap();
            assert_eq!(fc.value, d / c);
            assert_eq!(fc.direction == Direction::Up, fc.value > 1.0);
        }
    }

    #[test]
    fn test_zero_control_fails() {
        for d in [0.0, 1.0, 55.0] {
            assert!(matches!(compute_fold_change(0.0, d), Err(StatsError::DivisionByZero(_))));
        }
    }

    #[test]
    fn test_negative_or_nan_rejected() {
        assert!(matches!(compute_fold_change(-1.0, 2.0), Err(StatsError::InvalidInput(_))));
        assert!(matches!(compute_fold_change(1.0, f64::NAN), Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_log2_fold_change() {
        let lfc = log2_fold_change(10.0, 40.0);
        assert!((lfc - (41f64.log2() - 11f64.log2())).abs() < 1e-12);
        assert!((lfc - 1.898).abs() < 1e-3);
        assert_eq!(log2_fold_change(0.0, 0.0), 0.0);
        assert!(log2_fold_change(40.0, 10.0) < 0.0);
    }

    #[test]
    fn test_direction_serializes_lowercase() {
        let json = serde_json::to_string(&Direction::Up).unwrap();
        assert_eq!(json, "\"up\"");
    }
}
