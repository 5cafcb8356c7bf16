//! Analysis policy constants

use serde::Serialize;

/// Outcome column of the default dataset
pub const DEFAULT_OUTCOME: &str = "Exam_Score";
/// Scores at or above this value count as a pass
pub const PASS_THRESHOLD: f64 = 60.0;
/// Minimum absolute correlation for a strong factor pair
pub const STRONG_CORRELATION_THRESHOLD: f64 = 0.5;
/// Number of factors listed per direction in the insights
pub const TOP_FACTORS: usize = 3;

/// Knobs of a single analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    pub outcome: String,
    pub pass_threshold: f64,
    pub insight_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            outcome: DEFAULT_OUTCOME.to_string(),
            pass_threshold: PASS_THRESHOLD,
            insight_threshold: STRONG_CORRELATION_THRESHOLD,
        }
    }
}
