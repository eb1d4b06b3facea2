//! Schema store error types
//!
//! Error codes:
//! - SCHEMA_STORE_INVALID_CONFIGURATION (FATAL)
//! - SCHEMA_STORE_VALIDATION_FAILED (ERROR)
//! - SCHEMA_STORE_NOT_FOUND (ERROR)
//! - SCHEMA_STORE_SERIALIZATION_FAILED (ERROR)
//! - SCHEMA_STORE_BACKEND_FAILED (ERROR)
//!
//! Every error carries the operation it came from and, when one was involved,
//! the record id.

use std::error::Error as StdError;
use std::fmt;

use crate::kv::KvError;
use crate::observability::Severity;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// What went wrong, for callers that branch on failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Facade built without a usable backend
    InvalidConfiguration,
    /// Caller input rejected before touching the backend
    ValidationError,
    /// No record stored under the requested id
    NotFound,
    /// Record could not be encoded or decoded
    SerializationError,
    /// The backend call itself failed
    BackendError,
}

impl ErrorKind {
    /// Returns the stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidConfiguration => "SCHEMA_STORE_INVALID_CONFIGURATION",
            ErrorKind::ValidationError => "SCHEMA_STORE_VALIDATION_FAILED",
            ErrorKind::NotFound => "SCHEMA_STORE_NOT_FOUND",
            ErrorKind::SerializationError => "SCHEMA_STORE_SERIALIZATION_FAILED",
            ErrorKind::BackendError => "SCHEMA_STORE_BACKEND_FAILED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::InvalidConfiguration => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Facade operation an error or event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Construct,
    Store,
    Get,
    List,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Construct => "construct",
            Operation::Store => "store",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Schema store error with full context
#[derive(Debug)]
pub struct SchemaStoreError {
    kind: ErrorKind,
    operation: Operation,
    /// Record id if applicable
    id: Option<String>,
    message: String,
    source: Option<BoxedCause>,
}

impl SchemaStoreError {
    fn new(kind: ErrorKind, operation: Operation, id: Option<&str>, message: String) -> Self {
        Self {
            kind,
            operation,
            id: id.map(str::to_string),
            message,
            source: None,
        }
    }

    fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Facade constructed without a backend
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::InvalidConfiguration,
            Operation::Construct,
            None,
            message.into(),
        )
    }

    /// Record rejected before any backend call
    pub fn validation(operation: Operation, id: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, operation, Some(id), message.into())
    }

    /// No record stored under `id`
    pub fn not_found(id: &str) -> Self {
        Self::new(
            ErrorKind::NotFound,
            Operation::Get,
            Some(id),
            format!("schema not found with id: {}", id),
        )
    }

    /// Encoding or decoding the record failed
    pub fn serialization(operation: Operation, id: &str, source: serde_json::Error) -> Self {
        let verb = match operation {
            Operation::Store => "encode",
            _ => "decode",
        };
        Self::new(
            ErrorKind::SerializationError,
            operation,
            Some(id),
            format!("could not {} schema: {}", verb, id),
        )
        .with_source(source)
    }

    /// The backend rejected or failed the call
    pub fn backend(operation: Operation, id: Option<&str>, source: KvError) -> Self {
        let message = match id {
            Some(id) => format!("could not {} schema: {}", operation, id),
            None => format!("could not {} schemas", operation),
        };
        Self::new(ErrorKind::BackendError, operation, id, message).with_source(source)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The record id involved, if any
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// The backend error this wraps, for `BackendError`
    pub fn kv_error(&self) -> Option<&KvError> {
        self.source.as_deref().and_then(|e| e.downcast_ref::<KvError>())
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl fmt::Display for SchemaStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.kind.code(), self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl StdError for SchemaStoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

/// Result type for schema store operations
pub type SchemaStoreResult<T> = Result<T, SchemaStoreError>;
