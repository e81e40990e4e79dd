//! Error types for the scoring engine

use thiserror::Error;

/// Scoring engine error
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed request input (bad amount, bad hour, wrong feature count)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Receiver has no profile in any configured source
    #[error("Party not found: {0}")]
    PartyNotFound(String),

    /// Classifier artifact missing, corrupt, or mis-sized. Fatal to
    /// scoring: there is no rules-only fallback.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Data source lookup failure
    #[error("Source error: {0}")]
    Source(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
