//! JSON export of a computed dashboard view

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{
    BandCount, BoxStats, DashboardView, FactorCorrelation, GroupStat, InsightSet, MetricError,
    MissingEntry, ScoreRange,
};

/// Metadata about the run that produced the view
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the export (RFC 3339)
    pub timestamp: String,
    pub scorelens_version: String,
    /// Human readable data source
    pub source: String,
    pub outcome_column: String,
    pub pass_threshold: f64,
    pub insight_threshold: f64,
    /// Active filter selection
    pub filters: BTreeMap<String, Vec<String>>,
}

#[derive(Serialize)]
pub struct OverviewExport {
    pub rows: usize,
    pub total_rows: usize,
    pub average: Option<f64>,
    pub average_delta: Option<f64>,
    pub pass_rate: Option<f64>,
    pub pass_rate_delta: Option<f64>,
    pub range: Option<ScoreRange>,
}

#[derive(Serialize)]
pub struct MatrixExport {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// Complete view export. Metrics that could not be computed are `null`, and
/// their fallback messages are listed under `notes`.
#[derive(Serialize)]
pub struct ViewExport {
    pub metadata: ExportMetadata,
    pub overview: OverviewExport,
    pub missing_values: Option<Vec<MissingEntry>>,
    pub performance_bands: Option<Vec<BandCount>>,
    pub group_by: Option<String>,
    pub group_means: Option<Vec<GroupStat>>,
    pub group_distribution: Option<Vec<BoxStats>>,
    pub correlations: Option<Vec<FactorCorrelation>>,
    pub correlation_matrix: Option<MatrixExport>,
    pub insights: InsightSet,
    pub notes: Vec<String>,
}

/// Export parameters that are not part of the view itself
pub struct ExportParams<'a> {
    pub source: &'a str,
    pub outcome_column: &'a str,
    pub pass_threshold: f64,
    pub insight_threshold: f64,
}

fn keep<T: Clone>(
    name: &str,
    value: &Result<T, MetricError>,
    notes: &mut Vec<String>,
) -> Option<T> {
    match value {
        Ok(v) => Some(v.clone()),
        Err(e) => {
            notes.push(format!("{}: {}", name, e.fallback_message()));
            None
        }
    }
}

/// Build the serialisable form of a view
pub fn build_export(view: &DashboardView, params: &ExportParams) -> ViewExport {
    let mut notes = Vec::new();

    let filters = view
        .selection
        .active()
        .map(|(column, values)| (column.clone(), values.iter().cloned().collect()))
        .collect();

    let overview = &view.overview;
    let overview = OverviewExport {
        rows: overview.rows,
        total_rows: overview.total_rows,
        average: keep("average", &overview.average, &mut notes),
        average_delta: overview.average_delta.as_ref().ok().copied(),
        pass_rate: keep("pass_rate", &overview.pass_rate, &mut notes),
        pass_rate_delta: overview.pass_rate_delta.as_ref().ok().copied(),
        range: keep("range", &overview.range, &mut notes),
    };

    let correlation_matrix = match &view.matrix {
        Ok(matrix) => Some(MatrixExport {
            columns: matrix.names().to_vec(),
            values: matrix.to_rows(),
        }),
        Err(e) => {
            notes.push(format!("correlation_matrix: {}", e.fallback_message()));
            None
        }
    };

    ViewExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            scorelens_version: env!("CARGO_PKG_VERSION").to_string(),
            source: params.source.to_string(),
            outcome_column: params.outcome_column.to_string(),
            pass_threshold: params.pass_threshold,
            insight_threshold: params.insight_threshold,
            filters,
        },
        overview,
        missing_values: keep("missing_values", &view.missing, &mut notes),
        performance_bands: keep("performance_bands", &view.bands, &mut notes),
        group_by: view.group_by.clone(),
        group_means: keep("group_means", &view.group_means, &mut notes),
        group_distribution: keep("group_distribution", &view.group_quartiles, &mut notes),
        correlations: keep("correlations", &view.correlations, &mut notes),
        correlation_matrix,
        insights: view.insights.clone(),
        notes,
    }
}

/// Write the view to a pretty-printed JSON file
pub fn export_view(view: &DashboardView, path: &Path, params: &ExportParams) -> Result<()> {
    let export = build_export(view, params);
    let json = serde_json::to_string_pretty(&export).context("Failed to serialize view")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    Ok(())
}
