//! Pearson / Spearman correlation and the model × model correlation matrix.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{Result, StatsError};

/// model id → gene id → mean expression.
pub type ExpressionByModel = HashMap<String, HashMap<String, f64>>;

/// Spread within the rounding error of the mean counts as none.
fn is_constant(sum_sq: f64, mean: f64, n: usize) -> bool {
    let n = n as f64;
    (sum_sq / n).sqrt() <= f64::EPSILON * n * mean.abs()
}

/// Pearson correlation coefficient of two equal-length vectors.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(StatsError::invalid(format!(
            "vectors differ in length ({} vs {})",
            x.len(),
            y.len()
        )));
    }
    let n = x.len();
    if n < 2 {
        return Err(StatsError::insufficient(format!(
            "correlation needs at least 2 paired values, got {n}"
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(StatsError::invalid("correlation inputs must be finite"));
    }

    let mx = x.iter().sum::<f64>() / n as f64;
    let my = y.iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if is_constant(sxx, mx, n) || is_constant(syy, my, n) {
        return Err(StatsError::degenerate("correlation of a constant vector is undefined"));
    }
    Ok((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// 1-based ranks in input order; tied values share their average rank.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0f64; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && indexed[j].1 == indexed[j + 1].1 {
            j += 1;
        }
        let avg_rank = (i + 1 + j + 1) as f64 / 2.0;
        for item in &indexed[i..=j] {
            ranks[item.0] = avg_rank;
        }
        i = j + 1;
    }
    ranks
}

/// Spearman rank correlation: Pearson on average ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(StatsError::invalid("correlation inputs must be finite"));
    }
    pearson(&average_ranks(x), &average_ranks(y))
}

/// Symmetric model × model Pearson matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    /// Model ids, sorted; row/column order of `values`.
    pub models: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn index_of(&self, model: &str) -> Option<usize> {
        self.models.iter().position(|m| m == model)
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.values[self.index_of(a)?][self.index_of(b)?])
    }
}

/// Pair two gene maps on their shared gene ids, sorted by id.
pub fn paired_by_gene(
    a: &HashMap<String, f64>,
    b: &HashMap<String, f64>,
) -> (Vec<String>, Vec<f64>, Vec<f64>) {
    let mut genes: Vec<&String> = a.keys().filter(|g| b.contains_key(*g)).collect();
    genes.sort();
    let xs = genes.iter().map(|g| a[*g]).collect();
    let ys = genes.iter().map(|g| b[*g]).collect();
    (genes.into_iter().cloned().collect(), xs, ys)
}

/// Pearson correlation between every pair of models over their shared genes.
///
/// Each unordered pair is computed once and mirrored, and the diagonal is
/// set to exactly 1.0 without computing anything. Genes and models are
/// sorted first, so the result does not depend on map iteration order.
pub fn compute_correlation_matrix(expression_by_model: &ExpressionByModel) -> Result<CorrelationMatrix> {
    let mut models: Vec<String> = expression_by_model.keys().cloned().collect();
    models.sort();
    let n = models.len();
    let mut values = vec![vec![0.0f64; n]; n];

    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let (genes, x, y) = paired_by_gene(
                &expression_by_model[&models[i]],
                &expression_by_model[&models[j]],
            );
            if genes.is_empty() {
                return Err(StatsError::insufficient(format!(
                    "models {} and {} share no genes",
                    models[i], models[j]
                )));
            }
            let r = pearson(&x, &y).map_err(|e| e.context(format!("{} vs {}", models[i], models[j])))?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { models, values })
}
