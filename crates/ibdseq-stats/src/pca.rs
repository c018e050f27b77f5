//! Principal component projection of labelled condition-mean samples.
//!
//! Features are standardized (zero mean, population unit variance) before
//! projection. Expression tables have far more genes than samples, so the
//! decomposition runs on the n × n sample Gram matrix Z·Zᵀ/(n−1) instead of
//! the p × p feature covariance; both share the same non-zero eigenvalues.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{Result, StatsError};

/// One input row: the mean expression vector of a (model, condition) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledSample {
    pub label: String,
    pub model: String,
    pub condition: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcaPoint {
    pub label: String,
    pub model: String,
    pub condition: String,
    /// Coordinates on PC1, PC2, …
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PcaProjection {
    pub num_components: usize,
    pub explained_variance: Vec<f64>,
    pub explained_variance_ratio: Vec<f64>,
    pub points: Vec<PcaPoint>,
}

/// Standardize columns in place. Fails on any zero-variance feature.
///
/// A spread within the rounding error of the column mean counts as zero.
fn standardize(x: &mut Array2<f64>) -> Result<()> {
    let n = x.nrows() as f64;
    for (j, mut col) in x.axis_iter_mut(Axis(1)).enumerate() {
        let mean = col.sum() / n;
        let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        if std <= f64::EPSILON * n * mean.abs() {
            return Err(StatsError::degenerate(format!(
                "feature {j} has zero variance across all samples"
            )));
        }
        col.mapv_inplace(|v| (v - mean) / std);
    }
    Ok(())
}

/// Eigenvalues and column eigenvectors of the symmetric Gram matrix.
fn gram_eigen(gram: &Array2<f64>) -> Result<(Vec<f64>, DMatrix<f64>)> {
    let n = gram.nrows();
    let matrix = DMatrix::from_fn(n, n, |i, j| gram[[i, j]]);
    let eigen = SymmetricEigen::try_new(matrix, f64::EPSILON, 0)
        .ok_or_else(|| StatsError::degenerate("eigen-decomposition did not converge"))?;
    Ok((eigen.eigenvalues.iter().copied().collect(), eigen.eigenvectors))
}

/// Project samples onto their top `num_components` principal components.
///
/// Components are ordered by explained variance, descending; equal
/// eigenvalues keep the solver's output order. Each component is signed so
/// that its largest-magnitude score (first one on ties) is positive.
pub fn compute_pca_projection(samples: &[LabeledSample], num_components: usize) -> Result<PcaProjection> {
    let n = samples.len();
    if n < 2 {
        return Err(StatsError::insufficient(format!("PCA needs at least 2 samples, got {n}")));
    }
    let p = samples[0].values.len();
    if let Some(bad) = samples.iter().find(|s| s.values.len() != p) {
        return Err(StatsError::invalid(format!(
            "sample {} has {} features, expected {p}",
            bad.label,
            bad.values.len()
        )));
    }
    if p == 0 {
        return Err(StatsError::insufficient("PCA needs at least 1 feature"));
    }
    if num_components == 0 || num_components > n.min(p) {
        return Err(StatsError::invalid(format!(
            "num_components must be in 1..={}, got {num_components}",
            n.min(p)
        )));
    }
    if samples.iter().flat_map(|s| s.values.iter()).any(|v| !v.is_finite()) {
        return Err(StatsError::invalid("PCA inputs must be finite"));
    }

    let mut x = Array2::<f64>::zeros((n, p));
    for (i, s) in samples.iter().enumerate() {
        for (j, v) in s.values.iter().enumerate() {
            x[[i, j]] = *v;
        }
    }
    standardize(&mut x)?;

    let dof = (n - 1) as f64;
    let gram = x.dot(&x.t()) / dof;
    let total_variance = gram.diag().sum();
    let (eigenvalues, eigenvectors) = gram_eigen(&gram)?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        eigenvalues[b]
            .partial_cmp(&eigenvalues[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut explained_variance = Vec::with_capacity(num_components);
    let mut explained_variance_ratio = Vec::with_capacity(num_components);
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(num_components);

    for &k in order.iter().take(num_components) {
        let lambda = eigenvalues[k].max(0.0);
        let scale = (lambda * dof).sqrt();
        let mut scores: Vec<f64> = eigenvectors.column(k).iter().map(|u| u * scale).collect();

        let mut pivot = 0;
        for (i, s) in scores.iter().enumerate() {
            if s.abs() > scores[pivot].abs() {
                pivot = i;
            }
        }
        if scores[pivot] < 0.0 {
            scores.iter_mut().for_each(|s| *s = -*s);
        }

        explained_variance.push(lambda);
        explained_variance_ratio.push(lambda / total_variance);
        columns.push(scores);
    }

    let points = samples
        .iter()
        .enumerate()
        .map(|(i, s)| PcaPoint {
            label: s.label.clone(),
            model: s.model.clone(),
            condition: s.condition.clone(),
            scores: columns.iter().map(|c| c[i]).collect(),
        })
        .collect();

    Ok(PcaProjection {
        num_components,
        explained_variance,
        explained_variance_ratio,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: &str, values: &[f64]) -> LabeledSample {
        let (model, condition) = label.split_once('_').unwrap_or((label, ""));
        LabeledSample {
            label: label.to_string(),
            model: model.to_string(),
            condition: condition.to_string(),
            values: values.to_vec(),
        }
    }

    fn four_samples() -> Vec<LabeledSample> {
        vec![
            sample("dss_Control", &[5.0, 1.0, 7.0, 2.0]),
            sample("dss_DSS", &[9.0, 0.5, 3.0, 4.0]),
            sample("uc_Control", &[4.5, 1.5, 6.0, 2.5]),
            sample("uc_UC", &[8.0, 0.2, 2.0, 6.0]),
        ]
    }

    #[test]
    fn test_identical_samples_are_degenerate() {
        let s = vec![sample("a_x", &[1.0, 2.0, 3.0]), sample("b_y", &[1.0, 2.0, 3.0])];
        assert!(matches!(compute_pca_projection(&s, 2), Err(StatsError::DegenerateInput(_))));
    }

    #[test]
    fn test_single_sample_is_insufficient() {
        let s = vec![sample("a_x", &[1.0, 2.0])];
        assert!(matches!(compute_pca_projection(&s, 2), Err(StatsError::InsufficientData(_))));
    }

    #[test]
    fn test_ragged_and_component_count_rejected() {
        let s = vec![sample("a_x", &[1.0, 2.0]), sample("b_y", &[1.0])];
        assert!(matches!(compute_pca_projection(&s, 1), Err(StatsError::InvalidInput(_))));
        assert!(matches!(compute_pca_projection(&four_samples(), 0), Err(StatsError::InvalidInput(_))));
        assert!(matches!(compute_pca_projection(&four_samples(), 5), Err(StatsError::InvalidInput(_))));
    }

    #[test]
    fn test_collinear_features_load_on_one_component() {
        let s = vec![
            sample("m_a", &[1.0, 2.0]),
            sample("m_b", &[2.0, 4.0]),
            sample("m_c", &[3.0, 6.0]),
        ];
        let proj = compute_pca_projection(&s, 2).unwrap();
        assert!((proj.explained_variance_ratio[0] - 1.0).abs() < 1e-9);
        assert!(proj.explained_variance_ratio[1].abs() < 1e-9);
        let pc1: Vec<f64> = proj.points.iter().map(|p| p.scores[0]).collect();
        assert!((pc1[0].abs() - 3f64.sqrt()).abs() < 1e-9);
        assert!(pc1[1].abs() < 1e-9);
        assert!(pc1[0] * pc1[2] < 0.0);
    }

    #[test]
    fn test_variance_ratios_descending_and_bounded() {
        let proj = compute_pca_projection(&four_samples(), 2).unwrap();
        let r = &proj.explained_variance_ratio;
        assert!(r[0] >= r[1] && r[1] >= 0.0);
        assert!(r.iter().sum::<f64>() <= 1.0 + 1e-9);
        assert_eq!(proj.points.len(), 4);
        assert_eq!(proj.points[1].label, "dss_DSS");
    }

    #[test]
    fn test_scores_reproduce_eigenvalues() {
        let proj = compute_pca_projection(&four_samples(), 2).unwrap();
        for k in 0..2 {
            let ss: f64 = proj.points.iter().map(|p| p.scores[k].powi(2)).sum();
            assert!((ss / 3.0 - proj.explained_variance[k]).abs() < 1e-9);
        }
        // components are orthogonal
        let dot: f64 = proj.points.iter().map(|p| p.scores[0] * p.scores[1]).sum();
        assert!(dot.abs() < 1e-9);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let a = compute_pca_projection(&four_samples(), 2).unwrap();
        let b = compute_pca_projection(&four_samples(), 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_large_mean_feature_with_spread_is_kept() {
        let s = vec![
            sample("m_a", &[1e13 + 1.0, 1.0]),
            sample("m_b", &[1e13 - 1.0, 2.0]),
            sample("m_c", &[1e13, 4.0]),
        ];
        let proj = compute_pca_projection(&s, 1).unwrap();
        assert_eq!(proj.points.len(), 3);
        assert!(proj.explained_variance[0] > 0.0);
    }

    #[test]
    fn test_rounded_constant_feature_is_degenerate() {
        let s = vec![
            sample("m_a", &[0.1, 1.0]),
            sample("m_b", &[0.1, 2.0]),
            sample("m_c", &[0.1, 3.0]),
        ];
        assert!(matches!(compute_pca_projection(&s, 1), Err(StatsError::DegenerateInput(_))));
    }
}
