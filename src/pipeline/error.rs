//! Error types for the analysis pipeline.
//!
//! Loader errors decide whether a session can start at all. Filter errors
//! reject a selection before any rows are touched. Metric errors are local to
//! a single query: the caller shows a fallback message for that metric and
//! carries on with its siblings.

use polars::prelude::PolarsError;
use thiserror::Error;

use super::schema::ColumnKind;

/// Errors raised while obtaining the dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    /// The uploaded bytes could not be parsed as CSV.
    ///
    /// Recoverable: the loader falls back to the remote object.
    #[error("uploaded file could not be parsed: {0}")]
    MalformedUpload(String),

    /// The remote object could not be fetched or parsed.
    ///
    /// Terminal for the session, there is nothing left to analyse.
    #[error("remote dataset unavailable: {0}")]
    RemoteUnavailable(String),
}

/// Errors raised by a single metric query.
#[derive(Debug, Error)]
pub enum MetricError {
    /// The requested column does not exist in the frame.
    #[error("column '{0}' not found")]
    ColumnMissing(String),

    /// Too few rows (or no usable values) to compute the metric.
    #[error("not enough data: {0}")]
    InsufficientData(String),

    /// The column exists but its kind is not accepted by the metric.
    #[error("column '{column}' is {found} but {metric} needs {expected}")]
    WrongKind {
        column: String,
        metric: &'static str,
        expected: &'static str,
        found: ColumnKind,
    },

    /// The column's dtype is neither text nor numeric.
    #[error("column '{column}' has unsupported type {dtype}")]
    UnsupportedType { column: String, dtype: String },

    /// Too many categories to summarise per group.
    #[error("column '{column}' has {distinct} distinct values")]
    TooManyCategories { column: String, distinct: usize },

    /// A derived column would overwrite an existing one.
    #[error("column '{0}' already exists and will not be overwritten")]
    ColumnConflict(String),

    #[error(transparent)]
    Frame(#[from] PolarsError),
}

impl MetricError {
    /// Text shown in place of the metric.
    pub fn fallback_message(&self) -> String {
        match self {
            MetricError::ColumnMissing(column) => {
                format!("Column '{}' is not available in this dataset.", column)
            }
            MetricError::InsufficientData(_) => "Not enough data for this view.".to_string(),
            MetricError::WrongKind { column, expected, .. } => {
                format!("'{}' cannot be used here (needs a {} column).", column, expected)
            }
            MetricError::UnsupportedType { column, .. } => {
                format!("'{}' has a type that cannot be analysed.", column)
            }
            MetricError::TooManyCategories { column, .. } => format!(
                "Too many unique values in '{}' for a meaningful breakdown.",
                column
            ),
            MetricError::ColumnConflict(column) => {
                format!("Column '{}' already exists in the dataset.", column)
            }
            MetricError::Frame(e) => format!("Could not compute this view: {}", e),
        }
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, MetricError::InsufficientData(_))
    }
}

/// Errors raised when a filter selection is invalid for the dataset.
///
/// A selection that matches zero rows is not an error.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("'{0}' is not a categorical column")]
    UnknownColumn(String),

    #[error("'{column}' has {distinct} distinct values and cannot be filtered")]
    Ineligible { column: String, distinct: usize },

    #[error("'{value}' is not an observed value of '{column}'")]
    UnknownValue { column: String, value: String },

    #[error("invalid filter '{0}', expected COLUMN=VALUE[,VALUE...]")]
    InvalidSyntax(String),

    #[error(transparent)]
    Frame(#[from] PolarsError),
}
