//! Error types.

use thiserror::Error;

/// Failures of the persistence slot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored tasks are corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to serialise tasks: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("storage quota exceeded: {needed} bytes needed, {quota} available")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// Failures of board operations. Task operations themselves never fail.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Task {0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = BoardError> = std::result::Result<T, E>;
