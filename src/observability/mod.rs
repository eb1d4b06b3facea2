//! Observability for schemastore
//!
//! Structured JSON logging with an injected sink. There is no global logger:
//! components that want to log are handed a `Logger` (usually wrapped in a
//! `LoggingObserver`).
//!
//! # Usage
//!
//! ```ignore
//! use schemastore::observability::{Logger, Severity};
//!
//! let logger = Logger::stderr(Severity::Info);
//! logger.info("SCHEMA_STORE_SUCCESS", &[("id", "email")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};

#[cfg(test)]
pub(crate) use logger::CaptureBuffer;
