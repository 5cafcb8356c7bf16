//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{
    AnalysisConfig, FilterError, FilterSelection, LoadOptions, ObjectLocation,
    DEFAULT_BUCKET, DEFAULT_ENDPOINT, DEFAULT_INFER_SCHEMA_LENGTH, DEFAULT_KEY, DEFAULT_OUTCOME,
};

/// Scorelens - explore the factors behind student exam performance
#[derive(Parser, Debug)]
#[command(name = "scorelens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// CSV file to analyse instead of the remote dataset.
    /// If it cannot be parsed, the remote dataset is used.
    #[arg(short, long)]
    pub upload: Option<PathBuf>,

    /// Bucket holding the default dataset
    #[arg(long, env = "SCORELENS_BUCKET", default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    /// Object key of the default dataset
    #[arg(long, env = "SCORELENS_KEY", default_value = DEFAULT_KEY)]
    pub key: String,

    /// URL template for fetching the remote object; {bucket} and {key} are substituted
    #[arg(long, env = "SCORELENS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Serve the bucket from a local directory instead of over HTTP.
    /// The object is read from <DIR>/<bucket>/<key>, or <DIR>/<key>.
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Outcome (exam score) column
    #[arg(long, default_value = DEFAULT_OUTCOME)]
    pub outcome: String,

    /// Scores at or above this value count as a pass
    #[arg(long, default_value = "60")]
    pub pass_threshold: f64,

    /// Minimum absolute correlation for a strong factor pair
    #[arg(long, default_value = "0.5", value_parser = validate_insight_threshold)]
    pub insight_threshold: f64,

    /// Filter rows by category, e.g. --filter Gender=Male,Female (repeatable)
    #[arg(short, long = "filter", value_name = "COLUMN=VALUES")]
    pub filters: Vec<String>,

    /// Categorical column for the per-category views.
    /// Defaults to the first categorical column.
    #[arg(long)]
    pub group_by: Option<String>,

    /// Show detailed statistics (column summaries, strong factor pairs)
    #[arg(long, default_value = "false")]
    pub details: bool,

    /// Write the computed view to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Skip interactive filter prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for CSV schema inference.
    /// Use 0 for full table scan.
    #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,

    /// Log progress information to stderr
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Cli {
    pub fn location(&self) -> ObjectLocation {
        ObjectLocation::new(&self.bucket, &self.key)
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            infer_schema_length: self.infer_schema_length,
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            outcome: self.outcome.clone(),
            pass_threshold: self.pass_threshold,
            insight_threshold: self.insight_threshold,
        }
    }

    /// Selection built from the `--filter` arguments
    pub fn filter_selection(&self) -> Result<FilterSelection, FilterError> {
        let mut selection = FilterSelection::new();
        for arg in &self.filters {
            selection.parse_arg(arg)?;
        }
        Ok(selection)
    }
}

/// Validator for insight_threshold parameter
fn validate_insight_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "insight_threshold must be between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
