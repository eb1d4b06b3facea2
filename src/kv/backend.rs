//! # Key-Value Backend Trait

use super::context::OpContext;
use super::errors::KvResult;

/// Namespaced byte store consumed by the schema facade.
///
/// A missing key is reported by `read` as an empty vector, not as an error.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Write `value` under `namespace/key`, replacing any previous value
    fn write(&self, ctx: &OpContext, namespace: &str, key: &str, value: &[u8]) -> KvResult<()>;

    /// Read the value at `namespace/key`; empty if absent
    fn read(&self, ctx: &OpContext, namespace: &str, key: &str) -> KvResult<Vec<u8>>;

    /// Read every value in `namespace`, in the backend's scan order
    fn read_all(&self, ctx: &OpContext, namespace: &str) -> KvResult<Vec<Vec<u8>>>;

    /// Delete `namespace/key`
    fn delete(&self, ctx: &OpContext, namespace: &str, key: &str) -> KvResult<()>;
}
