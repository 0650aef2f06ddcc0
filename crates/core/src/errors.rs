//! Error types for the farecast core crate

use thiserror::Error;

/// Errors that can occur while encoding trips or scoring prices.
///
/// Every variant is scoped to a single request or load attempt; none of
/// them is fatal to a serving process.
#[derive(Error, Debug)]
pub enum FarecastError {
    /// Request named the same airport as origin and destination
    #[error("origin and destination must differ (both were {0:?})")]
    SameOriginDestination(String),

    /// Travel date string did not parse as YYYY-MM-DD
    #[error("invalid travel date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },

    /// Departure time string did not parse as HH:MM
    #[error("invalid departure time {value:?}: expected HH:MM")]
    InvalidTime { value: String },

    /// Categorical value absent from the fitted encoding table
    #[error("unknown {column} category {value:?}: not seen during training")]
    UnknownCategory { column: &'static str, value: String },

    /// A required model artifact is missing from the model directory
    #[error("model unavailable: missing artifact {missing:?}")]
    ModelUnavailable { missing: String },

    /// Model failed structural validation
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Feature vector length does not match the fitted state
    #[error("feature size mismatch: expected {expected}, got {actual}")]
    FeatureSizeMismatch { expected: usize, actual: usize },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for farecast core operations
pub type Result<T> = std::result::Result<T, FarecastError>;
