//! Missing value analysis

use polars::prelude::*;
use serde::Serialize;

use super::error::MetricError;

/// Missing-value count of one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingEntry {
    pub column: String,
    pub count: usize,
    /// Share of rows that are null, 0-100
    pub percent: f64,
}

/// Count missing values per column.
///
/// A value is missing when it is null or, in a float column, `NaN`. Only
/// columns with at least one missing value are reported, in dataset column
/// order. An empty result means the data is complete.
pub fn missingness(df: &DataFrame) -> Result<Vec<MissingEntry>, MetricError> {
    let rows = df.height();
    if rows == 0 {
        return Err(MetricError::InsufficientData("no rows".to_string()));
    }

    let mut entries = Vec::new();
    for column in df.get_columns() {
        let count = column.null_count() + nan_count(column)?;
        if count > 0 {
            entries.push(MissingEntry {
                column: column.name().to_string(),
                count,
                percent: count as f64 / rows as f64 * 100.0,
            });
        }
    }
    Ok(entries)
}

fn nan_count(column: &Column) -> PolarsResult<usize> {
    if !column.dtype().is_float() {
        return Ok(0);
    }
    let values = column.cast(&DataType::Float64)?;
    let count = values
        .f64()?
        .into_iter()
        .filter(|v| v.is_some_and(f64::is_nan))
        .count();
    Ok(count)
}
