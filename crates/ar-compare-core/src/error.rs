//! Error types for AR Compare core.

use thiserror::Error;

/// Errors from encoding or decoding the persisted comparison document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The stored text is not valid JSON, or the state could not be encoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The stored JSON is not a comparison document.
    #[error("unexpected document shape: {0}")]
    Shape(String),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
