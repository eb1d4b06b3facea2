//! # Key-Value Backend
//!
//! The byte-level contract the schema facade is written against, plus two
//! implementations: a volatile in-memory store and a file-per-key local store.

pub mod backend;
pub mod context;
pub mod errors;
pub mod local;
pub mod memory;

pub use backend::KeyValueStore;
pub use context::{CancelHandle, OpContext};
pub use errors::{KvError, KvResult};
pub use local::LocalStore;
pub use memory::InMemoryStore;
