use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by Label Trends.
#[derive(Error, Debug)]
pub enum TrendsError {
    /// The issue-tracking backend could not be queried (network, auth, bad
    /// query or an undecodable response). Aborts the whole search.
    #[error("Backend fetch failed: {0}")]
    BackendFetch(String),

    /// An issue timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// A date filter value was not of the form `YYYY-M-D`.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A timezone name is not a recognised IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// An issue record was missing a required field.
    #[error("Malformed issue: {0}")]
    MalformedIssue(String),

    /// A dump file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the trends crates.
pub type Result<T> = std::result::Result<T, TrendsError>;
