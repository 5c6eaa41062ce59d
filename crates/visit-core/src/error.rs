use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while loading and configuring visit statistics.
///
/// The aggregation itself is infallible; these arise at the ingestion and
/// configuration boundaries only.
#[derive(Error, Debug)]
pub enum VisitError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A timestamp string did not match any recognised format.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// An epoch-millisecond value lies outside the representable range.
    #[error("Timestamp out of range: {0}ms")]
    TimestampOutOfRange(i64),

    /// The event document has the wrong shape.
    #[error("Invalid event data: {0}")]
    InvalidEvent(String),

    /// The allowed-hours window is inconsistent.
    #[error("Invalid access policy: {0}")]
    InvalidPolicy(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the visit crates.
pub type Result<T> = std::result::Result<T, VisitError>;
