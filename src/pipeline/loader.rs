//! Dataset loader: uploaded bytes first, remote object as the fallback

use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use polars::prelude::*;
use tracing::{debug, info, warn};

use super::error::LoadError;
use super::source::{ObjectLocation, ObjectStore};

/// Default number of rows used for CSV schema inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

/// Field values read as missing in every column, in addition to empty fields
pub const MISSING_VALUE_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parsing options shared by both sources
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Rows used for schema inference; 0 scans the whole file
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

/// Where a loaded dataset came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Upload,
    Remote { bucket: String, key: String },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Upload => write!(f, "uploaded file"),
            DataSource::Remote { bucket, key } => write!(f, "remote object {}/{}", bucket, key),
        }
    }
}

/// A parsed dataset together with its origin
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub df: DataFrame,
    pub source: DataSource,
    /// Set when an upload was supplied but could not be parsed
    pub upload_error: Option<LoadError>,
}

/// Parse delimited text with a header row into a DataFrame.
///
/// The bytes must be UTF-8; a leading BOM is dropped. Empty fields and any of
/// [`MISSING_VALUE_TOKENS`] become nulls.
pub fn parse_csv_bytes(bytes: &[u8], infer_schema_length: usize) -> Result<DataFrame, String> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        return Err("input is not valid UTF-8".to_string());
    }
    if text.trim().is_empty() {
        return Err("input is empty".to_string());
    }

    let schema_length = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let null_values = NullValues::AllColumns(
        MISSING_VALUE_TOKENS
            .iter()
            .map(|token| (*token).into())
            .collect(),
    );

    let cursor = Cursor::new(text.into_owned().into_bytes());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
        .with_infer_schema_length(schema_length)
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(|e| e.to_string())?;

    if df.width() == 0 {
        return Err("no columns found".to_string());
    }

    Ok(df)
}

/// Load the session dataset.
///
/// An upload that fails to parse is not fatal: the error is logged, kept on
/// the result, and the remote object is used instead. Failure to fetch or
/// parse the remote object is fatal.
pub fn load(
    upload: Option<&[u8]>,
    store: &dyn ObjectStore,
    location: &ObjectLocation,
    options: &LoadOptions,
) -> Result<LoadedDataset, LoadError> {
    let mut upload_error = None;

    if let Some(bytes) = upload {
        match parse_csv_bytes(bytes, options.infer_schema_length) {
            Ok(df) => {
                info!(rows = df.height(), columns = df.width(), "loaded uploaded file");
                return Ok(LoadedDataset {
                    df,
                    source: DataSource::Upload,
                    upload_error: None,
                });
            }
            Err(message) => {
                warn!(error = %message, "uploaded file could not be parsed, falling back to remote");
                upload_error = Some(LoadError::MalformedUpload(message));
            }
        }
    }

    let target = store.describe(location);
    let bytes = store
        .get_object(location)
        .map_err(|e| LoadError::RemoteUnavailable(format!("{:#}", e)))?;
    let df = parse_csv_bytes(&bytes, options.infer_schema_length)
        .map_err(|message| LoadError::RemoteUnavailable(format!("{}: {}", target, message)))?;

    info!(source = %target, rows = df.height(), columns = df.width(), "loaded remote dataset");

    Ok(LoadedDataset {
        df,
        source: DataSource::Remote {
            bucket: location.bucket.clone(),
            key: location.key.clone(),
        },
        upload_error,
    })
}

/// Identity of a load request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Content of the uploaded bytes
    Upload(Arc<[u8]>),
    Remote { bucket: String, key: String },
}

impl CacheKey {
    pub fn for_request(upload: Option<&[u8]>, location: &ObjectLocation) -> Self {
        match upload {
            Some(bytes) => CacheKey::Upload(Arc::from(bytes)),
            None => CacheKey::Remote {
                bucket: location.bucket.clone(),
                key: location.key.clone(),
            },
        }
    }
}

/// Memoises successful loads so repeated views never repeat the I/O.
///
/// Failed loads are not cached.
#[derive(Debug, Default)]
pub struct LoaderCache {
    entries: HashMap<CacheKey, LoadedDataset>,
    hits: usize,
    misses: usize,
}

impl LoaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_cached(
        &mut self,
        upload: Option<&[u8]>,
        store: &dyn ObjectStore,
        location: &ObjectLocation,
        options: &LoadOptions,
    ) -> Result<LoadedDataset, LoadError> {
        let key = CacheKey::for_request(upload, location);

        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            debug!(upload = matches!(key, CacheKey::Upload(_)), "loader cache hit");
            return Ok(hit.clone());
        }

        self.misses += 1;
        let loaded = load(upload, store, location, options)?;
        self.entries.insert(key, loaded.clone());
        Ok(loaded)
    }

    /// Drop every entry keyed by upload content
    pub fn invalidate_uploads(&mut self) {
        self.entries
            .retain(|key, _| !matches!(key, CacheKey::Upload(_)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
