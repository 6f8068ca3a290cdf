//! Error types for the nearshot photo discovery pipeline.
//!
//! Errors are organized by concern: configuration problems, pipeline
//! failures (one per stage of the locate → search → fetch → decode chain),
//! and a top-level wrapper for callers that don't care which layer failed.

use thiserror::Error;

/// Top-level error type for nearshot operations.
#[derive(Error, Debug)]
pub enum NearshotError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline execution errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline execution errors, one per failure mode of a search run.
///
/// An empty search result is not an error; it is surfaced as
/// [`crate::pipeline::SearchOutcome::Empty`].
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No location fix could be obtained
    #[error("No location fix: {0}")]
    LocationUnavailable(String),

    /// Search or download transport failure (connection error or non-2xx)
    #[error("Network error for {url}: {message}")]
    Network {
        url: String,
        message: String,
        status_code: Option<u16>,
    },

    /// The provider response body could not be understood
    #[error("Malformed provider response: {0}")]
    Parse(String),

    /// Downloaded bytes could not be decoded into an image
    #[error("Decode error for {url}: {message}")]
    Decode { url: String, message: String },

    /// A pipeline stage exceeded its configured time limit
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },
}

/// Convenience type alias for nearshot results.
pub type Result<T> = std::result::Result<T, NearshotError>;

/// Convenience type alias for pipeline-stage results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
