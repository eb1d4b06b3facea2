//! # In-Memory Backend
//!
//! Volatile store for tests and embedding. Scans return values in key order.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::backend::KeyValueStore;
use super::context::OpContext;
use super::errors::{KvError, KvResult};

type Namespaces = BTreeMap<String, BTreeMap<String, Vec<u8>>>;

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    namespaces: RwLock<Namespaces>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys in a namespace
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .map(|ns| ns.get(namespace).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, namespace: &str) -> bool {
        self.len(namespace) == 0
    }
}

fn poisoned<T>(_: T) -> KvError {
    KvError::Internal("Lock poisoned".to_string())
}

impl KeyValueStore for InMemoryStore {
    fn write(&self, ctx: &OpContext, namespace: &str, key: &str, value: &[u8]) -> KvResult<()> {
        ctx.check()?;
        let mut namespaces = self.namespaces.write().map_err(poisoned)?;
        namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn read(&self, ctx: &OpContext, namespace: &str, key: &str) -> KvResult<Vec<u8>> {
        ctx.check()?;
        let namespaces = self.namespaces.read().map_err(poisoned)?;
        Ok(namespaces
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .cloned()
            .unwrap_or_default())
    }

    fn read_all(&self, ctx: &OpContext, namespace: &str) -> KvResult<Vec<Vec<u8>>> {
        ctx.check()?;
        let namespaces = self.namespaces.read().map_err(poisoned)?;
        Ok(namespaces
            .get(namespace)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    fn delete(&self, ctx: &OpContext, namespace: &str, key: &str) -> KvResult<()> {
        ctx.check()?;
        let mut namespaces = self.namespaces.write().map_err(poisoned)?;
        if let Some(entries) = namespaces.get_mut(namespace) {
            entries.remove(key);
        }
        Ok(())
    }
}
