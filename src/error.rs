//! Error types for apidex operations.

use thiserror::Error;

/// Errors that can occur while working with the catalogue.
#[derive(Debug, Error)]
pub enum ApidexError {
    /// Reading the dataset failed.
    #[error("failed to read dataset '{path}': {source}")]
    DatasetRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the dataset failed.
    #[error("failed to write dataset '{path}': {source}")]
    DatasetWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The dataset is not valid JSON or does not match the entry schema.
    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No catalogue entry matched the query.
    #[error("no entry matching '{0}'")]
    NoMatch(String),

    /// Several entries matched an operation that needs exactly one.
    #[error("'{query}' is ambiguous, matches: {}", names.join(", "))]
    Ambiguous { query: String, names: Vec<String> },

    /// A CLI argument combination is invalid.
    #[error("{0}")]
    InvalidArgument(String),

    /// The dataset failed validation.
    #[error("dataset validation failed with {0} violation(s)")]
    ValidationFailed(usize),

    /// One or more health-check probes failed.
    #[error("health check failed for {0} endpoint(s)")]
    CheckFailed(usize),
}

/// Result type alias for apidex operations.
pub type Result<T> = core::result::Result<T, ApidexError>;
