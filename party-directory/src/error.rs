//! Error types for the party directory

use thiserror::Error;

/// Directory loading error
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Export file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export row could not be decoded
    #[error("CSV decode error: {0}")]
    Csv(#[from] csv::Error),

    /// Row decoded but carried an unusable value
    #[error("Malformed record: {0}")]
    Parse(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, DirectoryError>;
