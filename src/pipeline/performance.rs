//! Score banding into performance categories

use std::fmt;

use polars::prelude::*;
use serde::Serialize;

use super::error::MetricError;
use super::metrics::{numeric_values, Metric};

/// Name of the derived band column
pub const PERFORMANCE_CATEGORY_COLUMN: &str = "Performance_Category";

/// Ordinal score band, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PerformanceBand {
    Excellent,
    VeryGood,
    Good,
    Satisfactory,
    NeedsImprovement,
}

impl PerformanceBand {
    /// Display order
    pub const ALL: [PerformanceBand; 5] = [
        PerformanceBand::Excellent,
        PerformanceBand::VeryGood,
        PerformanceBand::Good,
        PerformanceBand::Satisfactory,
        PerformanceBand::NeedsImprovement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent (90-100)",
            PerformanceBand::VeryGood => "Very Good (80-89)",
            PerformanceBand::Good => "Good (70-79)",
            PerformanceBand::Satisfactory => "Satisfactory (60-69)",
            PerformanceBand::NeedsImprovement => "Needs Improvement (<60)",
        }
    }
}

impl fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Band a score; thresholds are checked from the top down.
pub fn categorize(score: f64) -> PerformanceBand {
    if score >= 90.0 {
        PerformanceBand::Excellent
    } else if score >= 80.0 {
        PerformanceBand::VeryGood
    } else if score >= 70.0 {
        PerformanceBand::Good
    } else if score >= 60.0 {
        PerformanceBand::Satisfactory
    } else {
        PerformanceBand::NeedsImprovement
    }
}

/// Rows falling into one band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCount {
    pub band: PerformanceBand,
    pub label: &'static str,
    pub count: usize,
    /// Share of banded (non-null) scores, 0-100
    pub percent: f64,
}

/// Count scores per band, in band order.
///
/// Null scores are skipped and bands nobody falls into are omitted.
pub fn band_distribution(df: &DataFrame, column: &str) -> Result<Vec<BandCount>, MetricError> {
    let scores: Vec<f64> = numeric_values(df, column, Metric::PerformanceBand)?
        .into_iter()
        .flatten()
        .collect();
    if scores.is_empty() {
        return Err(MetricError::InsufficientData(format!(
            "no scores in '{}'",
            column
        )));
    }

    let mut counts = [0usize; 5];
    for score in &scores {
        counts[categorize(*score) as usize] += 1;
    }

    let total = scores.len() as f64;
    Ok(PerformanceBand::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(band, count)| BandCount {
            band: *band,
            label: band.label(),
            count,
            percent: count as f64 / total * 100.0,
        })
        .collect())
}

/// Return a copy of the frame with a `Performance_Category` label per row.
///
/// The input is not modified. Rows with a null score get a null label.
/// Refuses to overwrite an existing column of the same name.
pub fn with_performance_category(df: &DataFrame, column: &str) -> Result<DataFrame, MetricError> {
    if df
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == PERFORMANCE_CATEGORY_COLUMN)
    {
        return Err(MetricError::ColumnConflict(
            PERFORMANCE_CATEGORY_COLUMN.to_string(),
        ));
    }

    let labels: Vec<Option<&str>> = numeric_values(df, column, Metric::PerformanceBand)?
        .into_iter()
        .map(|score| score.map(|s| categorize(s).label()))
        .collect();

    let mut out = df.clone();
    out.with_column(Column::new(PERFORMANCE_CATEGORY_COLUMN.into(), labels))?;
    Ok(out)
}
