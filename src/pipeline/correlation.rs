//! Pearson correlation between numeric columns

use faer::Mat;
use polars::prelude::*;
use serde::Serialize;

use super::error::MetricError;
use super::metrics::{numeric_values, Metric};

/// Correlation of one factor with the outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorCorrelation {
    pub factor: String,
    /// `None` when undefined (constant column or fewer than two complete rows)
    pub correlation: Option<f64>,
}

/// Compute Pearson correlation using Welford's algorithm
///
/// Only rows where both values are present take part. Returns `None` with
/// fewer than two such rows or when either side has zero variance.
pub(crate) fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let mut n = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / n;
            mean_y += dy / n;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if n < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let r = cov_xy / (var_x.sqrt() * var_y.sqrt());
    if r.is_nan() {
        None
    } else {
        Some(r.clamp(-1.0, 1.0))
    }
}

fn require_rows(df: &DataFrame) -> Result<(), MetricError> {
    if df.height() < 2 {
        Err(MetricError::InsufficientData(format!(
            "{} row(s), need at least 2",
            df.height()
        )))
    } else {
        Ok(())
    }
}

/// Pearson correlation between two numeric columns, in [-1, 1].
///
/// Undefined correlations are reported as `InsufficientData`, never as 0.
pub fn pairwise_correlation(
    df: &DataFrame,
    column_a: &str,
    column_b: &str,
) -> Result<f64, MetricError> {
    let xs = numeric_values(df, column_a, Metric::Correlation)?;
    let ys = numeric_values(df, column_b, Metric::Correlation)?;
    require_rows(df)?;

    pearson(&xs, &ys).ok_or_else(|| {
        MetricError::InsufficientData(format!(
            "correlation of '{}' and '{}' is undefined",
            column_a, column_b
        ))
    })
}

/// Correlation of every factor with the outcome, in factor order
pub fn correlation_table(
    df: &DataFrame,
    factors: &[String],
    outcome: &str,
) -> Result<Vec<FactorCorrelation>, MetricError> {
    let outcome_values = numeric_values(df, outcome, Metric::Correlation)?;
    require_rows(df)?;

    factors
        .iter()
        .filter(|factor| factor.as_str() != outcome)
        .map(|factor| {
            let values = numeric_values(df, factor, Metric::Correlation)?;
            Ok(FactorCorrelation {
                factor: factor.clone(),
                correlation: pearson(&values, &outcome_values),
            })
        })
        .collect()
}

/// Symmetric correlation matrix over a set of numeric columns
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    values: Mat<f64>,
}

impl CorrelationMatrix {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Entry `(i, j)`, `None` when the correlation is undefined
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let value = self.values[(i, j)];
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    pub fn get_by_name(&self, a: &str, b: &str) -> Option<f64> {
        self.get(self.index_of(a)?, self.index_of(b)?)
    }

    /// Row-major copy for serialisation
    pub fn to_rows(&self) -> Vec<Vec<Option<f64>>> {
        (0..self.len())
            .map(|i| (0..self.len()).map(|j| self.get(i, j)).collect())
            .collect()
    }
}

/// Correlation matrix of `columns` plus the outcome column.
///
/// The outcome is appended when not already listed. The diagonal is 1.0 by
/// definition; undefined off-diagonal entries read back as `None`.
pub fn correlation_matrix(
    df: &DataFrame,
    columns: &[String],
    outcome: &str,
) -> Result<CorrelationMatrix, MetricError> {
    let mut names: Vec<String> = columns.to_vec();
    if !names.iter().any(|n| n == outcome) {
        names.push(outcome.to_string());
    }

    let values: Vec<Vec<Option<f64>>> = names
        .iter()
        .map(|name| numeric_values(df, name, Metric::Correlation))
        .collect::<Result<_, _>>()?;

    if names.len() < 2 {
        return Err(MetricError::InsufficientData(
            "need at least two numerical columns".to_string(),
        ));
    }
    require_rows(df)?;

    let n = names.len();
    let mut matrix = Mat::<f64>::zeros(n, n);
    for i in 0..n {
        matrix[(i, i)] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&values[i], &values[j]).unwrap_or(f64::NAN);
            matrix[(i, j)] = r;
            matrix[(j, i)] = r;
        }
    }

    Ok(CorrelationMatrix {
        names,
        values: matrix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_skips_incomplete_rows() {
        let xs = [Some(1.0), Some(2.0), None, Some(3.0)];
        let ys = [Some(2.0), Some(4.0), Some(100.0), Some(6.0)];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_is_undefined() {
        let xs = [Some(1.0), Some(1.0), Some(1.0)];
        let ys = [Some(2.0), Some(4.0), Some(6.0)];
        assert_eq!(pearson(&xs, &ys), None);
    }

    #[test]
    fn test_pearson_single_row_is_undefined() {
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
    }
}
