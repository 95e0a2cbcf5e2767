//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Post {id} not found")]
    NotFound { id: u64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Storage-level errors raised by a [`DocumentStore`](crate::ports::DocumentStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The document could not be read (I/O other than "not found").
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The document exists but does not parse.
    #[error("Storage document is corrupt: {0}")]
    Corrupt(String),

    /// The document could not be persisted.
    #[error("Storage write failed: {0}")]
    Write(String),
}
