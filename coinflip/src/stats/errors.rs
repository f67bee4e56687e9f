//! Stats error types.

use thiserror::Error;

/// Stats errors
#[derive(Debug, Error)]
pub enum StatsError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backing store unavailable or rejected the write
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type for stats operations
pub type StatsResult<T> = Result<T, StatsError>;
