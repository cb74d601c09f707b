//! Error types for storage backends.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend failed (timeout, conflict, quota, I/O).
    ///
    /// This class of error is propagated to callers unchanged; the mapping
    /// layer never retries or rewrites it.
    #[error("backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },

    /// A transaction handle is unknown or already closed.
    #[error("unknown transaction: {id}")]
    UnknownTransaction {
        /// The offending handle.
        id: u64,
    },

    /// An operation that requires a complete key was given an incomplete one.
    #[error("incomplete key for kind {kind}")]
    IncompleteKey {
        /// Kind of the offending key.
        kind: String,
    },
}

impl StorageError {
    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Creates an unknown transaction error.
    pub fn unknown_transaction(id: u64) -> Self {
        Self::UnknownTransaction { id }
    }

    /// Creates an incomplete key error.
    pub fn incomplete_key(kind: impl Into<String>) -> Self {
        Self::IncompleteKey { kind: kind.into() }
    }
}
