//! CLI error types
//!
//! Every failure carries a stable code for the `{"status":"error"}` response.
//! Store failures keep the store's own code.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::SchemaStoreError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error("Empty input")]
    EmptyInput,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory already initialized: {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("Data directory not initialized: {}. Run 'schemastore init' first.", .0.display())]
    NotInitialized(PathBuf),

    #[error(transparent)]
    Store(#[from] SchemaStoreError),
}

impl CliError {
    /// Stable code written to the error response
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "SCHEMASTORE_CLI_CONFIG_ERROR",
            Self::EmptyInput | Self::Io(_) | Self::Json(_) => "SCHEMASTORE_CLI_IO_ERROR",
            Self::AlreadyInitialized(_) => "SCHEMASTORE_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized(_) => "SCHEMASTORE_CLI_NOT_INITIALIZED",
            Self::Store(e) => e.code(),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
