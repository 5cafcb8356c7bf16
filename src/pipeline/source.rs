//! Remote object sources for the default dataset

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Bucket holding the default dataset
pub const DEFAULT_BUCKET: &str = "student-performance-app-files";
/// Key of the default dataset inside [`DEFAULT_BUCKET`]
pub const DEFAULT_KEY: &str = "StudentPerformanceFactors.csv";
/// Virtual-hosted S3 style URL; `{bucket}` and `{key}` are substituted
pub const DEFAULT_ENDPOINT: &str = "https://{bucket}.s3.amazonaws.com/{key}";

/// Bucket and key of a remote object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl Default for ObjectLocation {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKET, DEFAULT_KEY)
    }
}

/// Anything that can hand back the bytes of an object given its bucket and key.
pub trait ObjectStore {
    fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>>;

    /// Short description used in log lines
    fn describe(&self, location: &ObjectLocation) -> String {
        format!("{}/{}", location.bucket, location.key)
    }
}

/// Fetches objects with a plain HTTP GET
pub struct HttpObjectStore {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpObjectStore {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn object_url(&self, location: &ObjectLocation) -> String {
        self.endpoint
            .replace("{bucket}", &location.bucket)
            .replace("{key}", &location.key)
    }
}

impl ObjectStore for HttpObjectStore {
    fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>> {
        let url = self.object_url(location);
        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("{} returned an error status", url))?;

        let bytes = response
            .bytes()
            .with_context(|| format!("Failed to read body from {}", url))?;
        Ok(bytes.to_vec())
    }

    fn describe(&self, location: &ObjectLocation) -> String {
        self.object_url(location)
    }
}

/// Serves objects from a directory on disk.
///
/// An object resolves to `<root>/<bucket>/<key>`, or `<root>/<key>` when the
/// bucket directory does not exist.
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn object_path(&self, location: &ObjectLocation) -> PathBuf {
        let bucket_dir = self.root.join(&location.bucket);
        if bucket_dir.is_dir() {
            bucket_dir.join(&location.key)
        } else {
            self.root.join(&location.key)
        }
    }
}

impl ObjectStore for LocalObjectStore {
    fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>> {
        let path = self.object_path(location);
        std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn describe(&self, location: &ObjectLocation) -> String {
        self.object_path(location).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_substitutes_bucket_and_key() {
        let store = HttpObjectStore::new("https://{bucket}.example.com/{key}").unwrap();
        let url = store.object_url(&ObjectLocation::new("b", "data.csv"));
        assert_eq!(url, "https://b.example.com/data.csv");
    }

    #[test]
    fn test_default_location() {
        let location = ObjectLocation::default();
        assert_eq!(location.bucket, DEFAULT_BUCKET);
        assert_eq!(location.key, DEFAULT_KEY);
    }
}
