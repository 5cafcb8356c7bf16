//! Read-only summary metrics over a (filtered) dataset
//!
//! Every query takes the frame by reference and returns either a value or a
//! [`MetricError`]. Column kinds are checked through a single dispatch table,
//! [`Metric::accepts`], instead of ad hoc dtype checks in each query.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::Serialize;

use super::config::AnalysisConfig;
use super::error::MetricError;
use super::schema::{ColumnKind, MAX_FILTER_CARDINALITY};

/// Queries that read a column, with the column kinds each one accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Average,
    Min,
    Max,
    PassRate,
    PerformanceBand,
    GroupKey,
    GroupValue,
    Correlation,
    Describe,
    Distinct,
}

impl Metric {
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Average => "average",
            Metric::Min => "min",
            Metric::Max => "max",
            Metric::PassRate => "pass rate",
            Metric::PerformanceBand => "performance band",
            Metric::GroupKey => "grouping",
            Metric::GroupValue => "group mean",
            Metric::Correlation => "correlation",
            Metric::Describe => "describe",
            Metric::Distinct => "distinct count",
        }
    }

    pub fn accepts(&self) -> &'static [ColumnKind] {
        match self {
            Metric::GroupKey | Metric::Distinct => &[ColumnKind::Categorical],
            Metric::Average
            | Metric::Min
            | Metric::Max
            | Metric::PassRate
            | Metric::PerformanceBand
            | Metric::GroupValue
            | Metric::Correlation
            | Metric::Describe => &[ColumnKind::Numerical],
        }
    }

    fn expected(&self) -> &'static str {
        match self.accepts() {
            [ColumnKind::Categorical] => "categorical",
            [ColumnKind::Numerical] => "numerical",
            _ => "categorical or numerical",
        }
    }
}

/// Look up a column and check that `metric` accepts its kind.
pub fn resolve_column(
    df: &DataFrame,
    column: &str,
    metric: Metric,
) -> Result<ColumnKind, MetricError> {
    let col = df
        .column(column)
        .map_err(|_| MetricError::ColumnMissing(column.to_string()))?;

    let found = ColumnKind::from_dtype(col.dtype()).ok_or_else(|| MetricError::UnsupportedType {
        column: column.to_string(),
        dtype: col.dtype().to_string(),
    })?;

    if metric.accepts().contains(&found) {
        Ok(found)
    } else {
        Err(MetricError::WrongKind {
            column: column.to_string(),
            metric: metric.name(),
            expected: metric.expected(),
            found,
        })
    }
}

/// Numeric values of a column as f64, with nulls and `NaN` as `None`
pub(crate) fn numeric_values(
    df: &DataFrame,
    column: &str,
    metric: Metric,
) -> Result<Vec<Option<f64>>, MetricError> {
    resolve_column(df, column, metric)?;
    let cast = df.column(column)?.cast(&DataType::Float64)?;
    Ok(cast
        .f64()?
        .into_iter()
        .map(|v| v.filter(|v| !v.is_nan()))
        .collect())
}

/// Non-null numeric values; errors when the frame has no usable value
fn present_values(df: &DataFrame, column: &str, metric: Metric) -> Result<Vec<f64>, MetricError> {
    let values: Vec<f64> = numeric_values(df, column, metric)?
        .into_iter()
        .flatten()
        .collect();
    if values.is_empty() {
        return Err(MetricError::InsufficientData(format!(
            "no values in '{}'",
            column
        )));
    }
    Ok(values)
}

pub fn average(df: &DataFrame, column: &str) -> Result<f64, MetricError> {
    let values = present_values(df, column, Metric::Average)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn min(df: &DataFrame, column: &str) -> Result<f64, MetricError> {
    let values = present_values(df, column, Metric::Min)?;
    Ok(values.into_iter().fold(f64::INFINITY, f64::min))
}

pub fn max(df: &DataFrame, column: &str) -> Result<f64, MetricError> {
    let values = present_values(df, column, Metric::Max)?;
    Ok(values.into_iter().fold(f64::NEG_INFINITY, f64::max))
}

/// Percentage of rows whose value is at least `threshold`.
///
/// The denominator is every row of the frame, so a null value counts as a
/// fail.
pub fn pass_rate(df: &DataFrame, column: &str, threshold: f64) -> Result<f64, MetricError> {
    let values = numeric_values(df, column, Metric::PassRate)?;
    if values.is_empty() {
        return Err(MetricError::InsufficientData("no rows".to_string()));
    }
    let passed = values
        .iter()
        .filter(|v| v.is_some_and(|v| v >= threshold))
        .count();
    Ok(passed as f64 / values.len() as f64 * 100.0)
}

/// Lowest and highest outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

/// Headline numbers for the outcome column, with deltas against the full dataset.
///
/// Each metric degrades on its own.
#[derive(Debug)]
pub struct ScoreOverview {
    pub rows: usize,
    pub total_rows: usize,
    pub average: Result<f64, MetricError>,
    pub average_delta: Result<f64, MetricError>,
    pub pass_rate: Result<f64, MetricError>,
    pub pass_rate_delta: Result<f64, MetricError>,
    pub range: Result<ScoreRange, MetricError>,
}

impl ScoreOverview {
    pub fn compute(filtered: &DataFrame, full: &DataFrame, config: &AnalysisConfig) -> Self {
        let outcome = config.outcome.as_str();

        let average_now = average(filtered, outcome);
        let average_delta = average(filtered, outcome)
            .and_then(|now| average(full, outcome).map(|overall| now - overall));

        let pass_now = pass_rate(filtered, outcome, config.pass_threshold);
        let pass_rate_delta = pass_rate(filtered, outcome, config.pass_threshold).and_then(|now| {
            pass_rate(full, outcome, config.pass_threshold).map(|overall| now - overall)
        });

        let range = min(filtered, outcome)
            .and_then(|lo| max(filtered, outcome).map(|hi| ScoreRange { min: lo, max: hi }));

        Self {
            rows: filtered.height(),
            total_rows: full.height(),
            average: average_now,
            average_delta,
            pass_rate: pass_now,
            pass_rate_delta,
            range,
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.rows != self.total_rows
    }
}

/// Mean of a numeric column within one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub category: String,
    pub mean: f64,
    /// Non-null values contributing to the mean
    pub count: usize,
}

/// Collect the non-null values of `value_column` per label of `key_column`.
///
/// Rows with a null label are dropped. Labels iterate in sorted order.
fn grouped_values(
    df: &DataFrame,
    key_column: &str,
    value_column: &str,
) -> Result<BTreeMap<String, Vec<f64>>, MetricError> {
    resolve_column(df, key_column, Metric::GroupKey)?;
    let values = numeric_values(df, value_column, Metric::GroupValue)?;
    let keys = df.column(key_column)?.as_materialized_series().str()?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (key, value) in keys.into_iter().zip(values) {
        if let Some(key) = key {
            let entry = groups.entry(key.to_string()).or_default();
            if let Some(v) = value {
                entry.push(v);
            }
        }
    }
    groups.retain(|_, v| !v.is_empty());
    Ok(groups)
}

/// Mean and count of `value_column` per category, highest mean first.
///
/// Categories with equal means keep their label order.
pub fn group_mean(
    df: &DataFrame,
    key_column: &str,
    value_column: &str,
) -> Result<Vec<GroupStat>, MetricError> {
    if df.height() < 2 {
        return Err(MetricError::InsufficientData(format!(
            "{} row(s), need at least 2",
            df.height()
        )));
    }

    let mut stats: Vec<GroupStat> = grouped_values(df, key_column, value_column)?
        .into_iter()
        .map(|(category, values)| GroupStat {
            mean: values.iter().sum::<f64>() / values.len() as f64,
            count: values.len(),
            category,
        })
        .collect();

    if stats.is_empty() {
        return Err(MetricError::InsufficientData(format!(
            "no values of '{}' grouped by '{}'",
            value_column, key_column
        )));
    }

    stats.sort_by(|a, b| {
        b.mean
            .partial_cmp(&a.mean)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(stats)
}

/// Five-number summary of a numeric column within one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub category: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Per-category distribution of `value_column`, in label order.
///
/// Refused when the category column has more than
/// [`MAX_FILTER_CARDINALITY`] labels.
pub fn group_quartiles(
    df: &DataFrame,
    key_column: &str,
    value_column: &str,
) -> Result<Vec<BoxStats>, MetricError> {
    if df.height() < 2 {
        return Err(MetricError::InsufficientData(format!(
            "{} row(s), need at least 2",
            df.height()
        )));
    }

    let groups = grouped_values(df, key_column, value_column)?;
    if groups.len() > MAX_FILTER_CARDINALITY {
        return Err(MetricError::TooManyCategories {
            column: key_column.to_string(),
            distinct: groups.len(),
        });
    }

    Ok(groups
        .into_iter()
        .map(|(category, mut values)| {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            BoxStats {
                category,
                count: values.len(),
                min: values[0],
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values[values.len() - 1],
            }
        })
        .collect())
}

/// Linear-interpolated quantile of sorted, non-empty values
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
