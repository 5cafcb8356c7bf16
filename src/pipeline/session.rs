//! Session state and full-view recomputation
//!
//! A session owns the loaded dataset and its column classification. Each
//! change of filter selection or grouping column produces a fresh
//! [`DashboardView`] by running every stage again over the in-memory frame;
//! only the load step is memoised.

use polars::prelude::*;
use tracing::debug;

use super::config::AnalysisConfig;
use super::correlation::{correlation_matrix, correlation_table, CorrelationMatrix, FactorCorrelation};
use super::describe::{
    describe_categorical, describe_numerical, preview, CategoricalSummary, NumericSummary,
    PREVIEW_ROWS,
};
use super::error::{FilterError, LoadError, MetricError};
use super::filter::{apply_filters, FilterSelection};
use super::insights::{select_insights, InsightSet};
use super::loader::{DataSource, LoadOptions, LoadedDataset, LoaderCache};
use super::metrics::{group_mean, group_quartiles, BoxStats, GroupStat, ScoreOverview};
use super::missing::{missingness, MissingEntry};
use super::performance::{band_distribution, BandCount};
use super::schema::{classify, ColumnClassification};
use super::source::{ObjectLocation, ObjectStore};

/// Everything the front end shows for one filter selection
#[derive(Debug)]
pub struct DashboardView {
    pub selection: FilterSelection,
    pub filtered: DataFrame,
    pub overview: ScoreOverview,
    pub preview: DataFrame,
    pub missing: Result<Vec<MissingEntry>, MetricError>,
    pub bands: Result<Vec<BandCount>, MetricError>,
    pub group_by: Option<String>,
    pub group_means: Result<Vec<GroupStat>, MetricError>,
    pub group_quartiles: Result<Vec<BoxStats>, MetricError>,
    pub correlations: Result<Vec<FactorCorrelation>, MetricError>,
    pub matrix: Result<CorrelationMatrix, MetricError>,
    pub insights: InsightSet,
    pub numeric_summary: Result<Vec<NumericSummary>, MetricError>,
    pub categorical_summary: Result<Vec<CategoricalSummary>, MetricError>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        self.filtered.height() == 0
    }
}

pub struct Session {
    store: Box<dyn ObjectStore>,
    location: ObjectLocation,
    options: LoadOptions,
    config: AnalysisConfig,
    cache: LoaderCache,
    dataset: LoadedDataset,
    classification: ColumnClassification,
}

impl Session {
    /// Load the dataset (upload first, remote as fallback) and classify it.
    pub fn open(
        store: Box<dyn ObjectStore>,
        location: ObjectLocation,
        options: LoadOptions,
        config: AnalysisConfig,
        upload: Option<&[u8]>,
    ) -> Result<Self, LoadError> {
        let mut cache = LoaderCache::new();
        let dataset = cache.load_cached(upload, store.as_ref(), &location, &options)?;
        let classification = classify_loaded(&dataset)?;

        Ok(Self {
            store,
            location,
            options,
            config,
            cache,
            dataset,
            classification,
        })
    }

    /// Switch to a new upload (or back to the remote object with `None`).
    ///
    /// Cached uploads are discarded first so the new content is always parsed.
    pub fn replace_upload(&mut self, upload: Option<&[u8]>) -> Result<(), LoadError> {
        self.cache.invalidate_uploads();
        let dataset =
            self.cache
                .load_cached(upload, self.store.as_ref(), &self.location, &self.options)?;
        self.classification = classify_loaded(&dataset)?;
        self.dataset = dataset;
        Ok(())
    }

    pub fn dataset(&self) -> &DataFrame {
        &self.dataset.df
    }

    pub fn source(&self) -> &DataSource {
        &self.dataset.source
    }

    /// Parse error of an upload that was skipped in favour of the remote object
    pub fn upload_error(&self) -> Option<&LoadError> {
        self.dataset.upload_error.as_ref()
    }

    pub fn classification(&self) -> &ColumnClassification {
        &self.classification
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn cache(&self) -> &LoaderCache {
        &self.cache
    }

    /// Recompute every view for a selection.
    ///
    /// `group_by` picks the categorical column for the per-category views and
    /// defaults to the first categorical column. Only an invalid selection is
    /// an error; every metric degrades independently inside the view.
    pub fn view(
        &self,
        selection: &FilterSelection,
        group_by: Option<&str>,
    ) -> Result<DashboardView, FilterError> {
        let full = &self.dataset.df;
        let filtered = apply_filters(full, &self.classification, selection)?;
        let outcome = self.config.outcome.as_str();

        let group_by = group_by
            .map(str::to_string)
            .or_else(|| self.classification.categorical.first().cloned());
        let (group_means, group_quartiles) = match &group_by {
            Some(column) => (
                group_mean(&filtered, column, outcome),
                group_quartiles(&filtered, column, outcome),
            ),
            None => (
                Err(no_categorical_columns()),
                Err(no_categorical_columns()),
            ),
        };

        let factors = self.classification.factors(outcome);
        let correlations = correlation_table(&filtered, &factors, outcome);
        let matrix = correlation_matrix(&filtered, &factors, outcome);
        let insights = select_insights(
            correlations.as_deref().unwrap_or(&[]),
            matrix.as_ref().ok(),
            outcome,
            self.config.insight_threshold,
        );

        let view = DashboardView {
            overview: ScoreOverview::compute(&filtered, full, &self.config),
            preview: preview(&filtered, PREVIEW_ROWS),
            missing: missingness(&filtered),
            bands: band_distribution(&filtered, outcome),
            group_by,
            group_means,
            group_quartiles,
            correlations,
            matrix,
            insights,
            numeric_summary: describe_numerical(&filtered, &self.classification.numerical),
            categorical_summary: describe_categorical(&filtered, &self.classification.categorical),
            selection: selection.clone(),
            filtered,
        };

        debug!(
            rows = view.filtered.height(),
            total = full.height(),
            "recomputed dashboard view"
        );
        Ok(view)
    }
}

fn classify_loaded(dataset: &LoadedDataset) -> Result<ColumnClassification, LoadError> {
    classify(&dataset.df).map_err(|e| match dataset.source {
        DataSource::Upload => LoadError::MalformedUpload(e.to_string()),
        DataSource::Remote { .. } => LoadError::RemoteUnavailable(e.to_string()),
    })
}

fn no_categorical_columns() -> MetricError {
    MetricError::InsufficientData("no categorical columns to group by".to_string())
}
