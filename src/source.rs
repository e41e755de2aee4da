//! Where a dataset comes from: a local file or an HTTP endpoint.
//!
//! The accessor in [`crate::dataset`] loads through a [`DataSource`] exactly
//! once per session; everything downstream sees an immutable slice.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{ApidexError, Result};
use crate::models::ApiEntry;

const USER_AGENT: &str = concat!("apidex/", env!("CARGO_PKG_VERSION"));

/// A place the entry list can be fetched from.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable origin, used in logs and error messages.
    fn origin(&self) -> String;

    /// Fetch the full entry list.
    async fn fetch(&self) -> Result<Vec<ApiEntry>>;
}

/// Dataset stored in a local JSON file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<Vec<ApiEntry>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ApidexError::DatasetRead {
                path: self.origin(),
                source,
            })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Dataset served over HTTP as a JSON array.
pub struct HttpSource {
    url: Url,
    http: Client,
}

impl HttpSource {
    /// # Errors
    ///
    /// Returns an error if the URL does not parse or the client cannot be
    /// constructed.
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApidexError::Http)?;
        Ok(Self { url, http })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn origin(&self) -> String {
        self.url.to_string()
    }

    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<ApiEntry>> {
        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(ApidexError::Http)?
            .error_for_status()
            .map_err(ApidexError::Http)?;
        response.json().await.map_err(ApidexError::Http)
    }
}

/// Pick a source for a `--data` argument: URLs load over HTTP, anything
/// else is treated as a file path.
pub fn source_for(spec: &str) -> Result<Box<dyn DataSource>> {
    if spec.starts_with("http://") || spec.starts_with("https://") {
        Ok(Box::new(HttpSource::new(spec)?))
    } else {
        Ok(Box::new(FileSource::new(spec)))
    }
}
