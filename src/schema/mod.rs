//! Schema record storage
//!
//! Persistence facade for credential schema records over any `KeyValueStore`.
//!
//! # Behavior
//!
//! - All records live under the fixed `schema` namespace
//! - A record is one JSON blob keyed by its id; storing replaces it whole
//! - Empty ids are rejected before the backend is touched
//! - `get` maps an empty backend read to `NotFound`
//! - `list` returns what decodes and skips what doesn't
//! - No caching, no retries, no logging except through the injected observer

mod errors;
mod observer;
mod record;
mod storage;

pub use errors::{ErrorKind, Operation, SchemaStoreError, SchemaStoreResult};
pub use observer::{
    EventOutcome, LoggingObserver, MemoryObserver, NoopObserver, StoreEvent, StoreObserver,
};
pub use record::{SchemaDocument, SignedToken, StoredSchema};
pub use storage::{SchemaStorage, SchemaStorageBuilder, SCHEMA_NAMESPACE};
