//! Error types for the comparison store.

use thiserror::Error;

/// Errors that can occur when wiring up or using the comparison store.
///
/// Persistence failures never appear here. The worker logs and drops them,
/// and in-memory state stays authoritative.
#[derive(Debug, Error)]
pub enum ComparisonError {
    /// The store was accessed through a context no provider was mounted in.
    #[error("use_comparison must be called within a ComparisonProvider: no comparison store was provided")]
    MissingProvider,

    /// Configuration rejected at mount time.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Mounting requires a tokio runtime to run the persistence worker.
    #[error("no async runtime available: {0}")]
    NoRuntime(String),
}

/// Result type for comparison store operations.
pub type Result<T> = std::result::Result<T, ComparisonError>;
