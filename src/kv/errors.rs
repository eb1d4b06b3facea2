//! # Key-Value Errors

use thiserror::Error;

/// Result type for key-value operations
pub type KvResult<T> = Result<T, KvError>;

/// Errors reported by a key-value backend
#[derive(Debug, Clone, Error)]
pub enum KvError {
    // Addressing errors
    #[error("Key not found: {namespace}/{key}")]
    KeyNotFound { namespace: String, key: String },

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    // Call-context errors
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    // I/O errors
    #[error("I/O error: {0}")]
    IoError(String),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl KvError {
    /// Whether the failure came from the caller's context rather than the store
    pub fn is_context_error(&self) -> bool {
        matches!(self, KvError::Cancelled | KvError::DeadlineExceeded)
    }
}

impl From<std::io::Error> for KvError {
    fn from(e: std::io::Error) -> Self {
        KvError::IoError(e.to_string())
    }
}
