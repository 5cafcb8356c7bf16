//! Ranking of factor correlations into highlights

use std::cmp::Ordering;

use serde::Serialize;

use super::config::TOP_FACTORS;
use super::correlation::{CorrelationMatrix, FactorCorrelation};

/// Direction of a strong pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relationship {
    Positive,
    Negative,
}

/// A factor and its correlation with the outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFactor {
    pub factor: String,
    pub correlation: f64,
}

/// Two factors whose correlation clears the strong-pair threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrongPair {
    pub first: String,
    pub second: String,
    pub correlation: f64,
    pub relationship: Relationship,
}

/// Highlights derived from one correlation table and matrix
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightSet {
    pub top_positive: Vec<RankedFactor>,
    pub top_negative: Vec<RankedFactor>,
    pub strong_pairs: Vec<StrongPair>,
}

impl InsightSet {
    pub fn positive_message(&self) -> Option<&'static str> {
        self.top_positive
            .is_empty()
            .then_some("No significant positive correlations found.")
    }

    pub fn negative_message(&self) -> Option<&'static str> {
        self.top_negative
            .is_empty()
            .then_some("No significant negative correlations found.")
    }

    pub fn strong_pairs_message(&self) -> Option<&'static str> {
        self.strong_pairs
            .is_empty()
            .then_some("No strong correlations found between numerical variables.")
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Rank factors and pick strong pairs.
///
/// `table` supplies the top positive and negative factors, `matrix` the
/// pairs among non-outcome columns with `|r| >= threshold`. All sorts are
/// stable, so ties keep column order. Undefined correlations are skipped.
pub fn select_insights(
    table: &[FactorCorrelation],
    matrix: Option<&CorrelationMatrix>,
    outcome: &str,
    threshold: f64,
) -> InsightSet {
    let defined: Vec<RankedFactor> = table
        .iter()
        .filter_map(|entry| {
            entry.correlation.map(|correlation| RankedFactor {
                factor: entry.factor.clone(),
                correlation,
            })
        })
        .collect();

    let mut top_positive: Vec<RankedFactor> = defined
        .iter()
        .filter(|f| f.correlation > 0.0)
        .cloned()
        .collect();
    top_positive.sort_by(|a, b| descending(a.correlation, b.correlation));
    top_positive.truncate(TOP_FACTORS);

    let mut top_negative: Vec<RankedFactor> = defined
        .iter()
        .filter(|f| f.correlation < 0.0)
        .cloned()
        .collect();
    top_negative.sort_by(|a, b| descending(b.correlation, a.correlation));
    top_negative.truncate(TOP_FACTORS);

    let strong_pairs = matrix
        .map(|m| strong_pairs(m, outcome, threshold))
        .unwrap_or_default();

    InsightSet {
        top_positive,
        top_negative,
        strong_pairs,
    }
}

fn strong_pairs(matrix: &CorrelationMatrix, outcome: &str, threshold: f64) -> Vec<StrongPair> {
    let names = matrix.names();
    let mut pairs = Vec::new();

    for i in 0..names.len() {
        if names[i] == outcome {
            continue;
        }
        for j in (i + 1)..names.len() {
            if names[j] == outcome {
                continue;
            }
            if let Some(r) = matrix.get(i, j) {
                if r.abs() >= threshold {
                    pairs.push(StrongPair {
                        first: names[i].clone(),
                        second: names[j].clone(),
                        correlation: r,
                        relationship: if r > 0.0 {
                            Relationship::Positive
                        } else {
                            Relationship::Negative
                        },
                    });
                }
            }
        }
    }

    pairs.sort_by(|a, b| descending(a.correlation, b.correlation));
    pairs
}
