//! Unified error types for derby

use thiserror::Error;

/// Unified error type for all derby operations
#[derive(Error, Debug)]
pub enum DerbyError {
    // Input errors
    #[error("Invalid competitor count: {0}")]
    InvalidCompetitorCount(String),

    // Race execution errors
    #[error("Race aborted: {0}")]
    RaceAborted(String),

    // Result reporting errors
    #[error("Need at least {required} finishers to report winners, got {actual}")]
    InsufficientCompetitors { required: usize, actual: usize },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using DerbyError
pub type Result<T> = std::result::Result<T, DerbyError>;
