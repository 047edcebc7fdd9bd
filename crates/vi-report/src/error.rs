//! Error types for report generation.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that abort report generation.
#[derive(Error, Debug)]
pub enum ReportError {
    /// No inspection record was supplied.
    #[error("no inspection record supplied")]
    MissingInspection,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors resolving a single image. Never abort a report; the composer turns
/// them into [`crate::ImageResolutionWarning`]s.
#[derive(Error, Debug)]
pub enum ImageError {
    /// Reading the referenced file failed.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Inline data could not be decoded.
    #[error("invalid inline image data: {0}")]
    InlineData(String),

    /// Decoding or re-encoding failed.
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// Bytes are not a format we can embed.
    #[error("unsupported image format")]
    UnsupportedFormat,

    /// Source exceeds the configured size limit.
    #[error("image is {size} bytes, limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    /// Source was empty.
    #[error("image source is empty")]
    Empty,

    /// Remote fetching is not compiled in.
    #[error("remote image fetch disabled (build with the `remote` feature): {url}")]
    RemoteDisabled { url: String },

    /// Remote fetch failed.
    #[error("failed to fetch '{url}': {reason}")]
    Remote { url: String, reason: String },

    /// Background encoder task failed.
    #[error("image worker failed: {0}")]
    Worker(String),
}

impl From<tokio::task::JoinError> for ImageError {
    fn from(err: tokio::task::JoinError) -> Self {
        ImageError::Worker(err.to_string())
    }
}
