//! schemastore - persistence facade for credential schema records
//!
//! Typed store/get/list/delete over a namespaced key-value backend, with
//! best-effort listing that skips records it cannot decode.

pub mod cli;
pub mod kv;
pub mod observability;
pub mod schema;

pub use kv::{InMemoryStore, KeyValueStore, KvError, LocalStore, OpContext};
pub use schema::{
    ErrorKind, SchemaDocument, SchemaStorage, SchemaStoreError, SignedToken, StoredSchema,
    SCHEMA_NAMESPACE,
};
