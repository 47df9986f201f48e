//! Error types for the storage module.

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Writing the value would exceed the backend's byte quota.
    #[error("quota exceeded writing {key}: needs {needed} bytes, quota is {quota}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    /// The backend cannot be reached at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A blocking storage task failed to run to completion.
    #[error("storage task failed: {0}")]
    Task(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
