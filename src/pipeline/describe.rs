//! Per-column descriptive statistics for the detailed view

use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use super::error::MetricError;
use super::metrics::{numeric_values, quantile, resolve_column, Metric};

/// Rows shown in the data preview
pub const PREVIEW_ROWS: usize = 5;

/// count / mean / std / min / quartiles / max of a numeric column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Cardinality and mode of a categorical column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub column: String,
    /// Distinct non-null labels
    pub unique: usize,
    pub most_common: Option<String>,
    pub most_common_count: usize,
}

/// Describe numeric columns. Columns without any value are skipped.
pub fn describe_numerical(
    df: &DataFrame,
    columns: &[String],
) -> Result<Vec<NumericSummary>, MetricError> {
    if df.height() == 0 {
        return Err(MetricError::InsufficientData("no rows".to_string()));
    }

    let mut summaries = Vec::with_capacity(columns.len());
    for column in columns {
        let mut values: Vec<f64> = numeric_values(df, column, Metric::Describe)?
            .into_iter()
            .flatten()
            .collect();
        if values.is_empty() {
            continue;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = (values.len() > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        });

        summaries.push(NumericSummary {
            column: column.clone(),
            count: values.len(),
            mean,
            std,
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[values.len() - 1],
        });
    }
    Ok(summaries)
}

/// Describe categorical columns. Mode ties go to the label seen first.
pub fn describe_categorical(
    df: &DataFrame,
    columns: &[String],
) -> Result<Vec<CategoricalSummary>, MetricError> {
    if df.height() == 0 {
        return Err(MetricError::InsufficientData("no rows".to_string()));
    }

    let mut summaries = Vec::with_capacity(columns.len());
    for column in columns {
        resolve_column(df, column, Metric::Distinct)?;
        let ca = df.column(column)?.as_materialized_series().str()?;

        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in ca.into_iter().flatten() {
            let count = counts.entry(value).or_insert_with(|| {
                order.push(value);
                0
            });
            *count += 1;
        }

        let mut most_common: Option<(&str, usize)> = None;
        for &label in &order {
            let count = counts[label];
            if most_common.map_or(true, |(_, best)| count > best) {
                most_common = Some((label, count));
            }
        }

        summaries.push(CategoricalSummary {
            column: column.clone(),
            unique: order.len(),
            most_common: most_common.map(|(label, _)| label.to_string()),
            most_common_count: most_common.map_or(0, |(_, count)| count),
        });
    }
    Ok(summaries)
}

/// First `rows` rows of the frame
pub fn preview(df: &DataFrame, rows: usize) -> DataFrame {
    df.head(Some(rows))
}
