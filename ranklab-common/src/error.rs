//! Common error types for RankLab

use thiserror::Error;

/// Common result type for RankLab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across RankLab services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No active answer key; evaluation cannot run until one is uploaded
    #[error("No active answer key is configured")]
    NotConfigured,

    /// Participant has used up their submission allowance
    #[error("Submission quota exceeded: {used} of {allowed} submissions used")]
    QuotaExceeded { used: i64, allowed: i64 },

    /// Submission contained no usable rows after normalization
    #[error("Submission is empty after normalization")]
    EmptyInput,

    /// Submission shares no row identifiers with the answer key
    #[error("No overlapping row identifiers between submission and answer key")]
    NoOverlap,

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
