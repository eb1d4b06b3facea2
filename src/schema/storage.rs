//! Schema storage facade
//!
//! Typed store/get/list/delete over a `KeyValueStore`, confined to the
//! `schema` namespace. Every call is one synchronous round trip to the
//! backend; nothing is cached or retried.

use std::fmt;
use std::sync::Arc;

use super::errors::{Operation, SchemaStoreError, SchemaStoreResult};
use super::observer::{NoopObserver, StoreEvent, StoreObserver};
use super::record::StoredSchema;
use crate::kv::{KeyValueStore, OpContext};

/// Namespace holding every schema record
pub const SCHEMA_NAMESPACE: &str = "schema";

/// Persistence facade for schema records
#[derive(Clone)]
pub struct SchemaStorage {
    db: Arc<dyn KeyValueStore>,
    observer: Arc<dyn StoreObserver>,
}

impl fmt::Debug for SchemaStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaStorage")
            .field("db", &self.db)
            .field("namespace", &SCHEMA_NAMESPACE)
            .finish_non_exhaustive()
    }
}

/// Builder for `SchemaStorage`. A backend is required.
#[derive(Default)]
pub struct SchemaStorageBuilder {
    db: Option<Arc<dyn KeyValueStore>>,
    observer: Option<Arc<dyn StoreObserver>>,
}

impl SchemaStorageBuilder {
    pub fn backend(mut self, db: Arc<dyn KeyValueStore>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Fails with `InvalidConfiguration` when no backend was given
    pub fn build(self) -> SchemaStoreResult<SchemaStorage> {
        let db = self.db.ok_or_else(|| {
            SchemaStoreError::invalid_configuration("schema storage requires a key-value backend")
        })?;
        Ok(SchemaStorage {
            db,
            observer: self.observer.unwrap_or_else(|| Arc::new(NoopObserver)),
        })
    }
}

impl SchemaStorage {
    pub fn builder() -> SchemaStorageBuilder {
        SchemaStorageBuilder::default()
    }

    /// Build over `db` with no observer; an absent backend is rejected
    pub fn new(db: Option<Arc<dyn KeyValueStore>>) -> SchemaStoreResult<Self> {
        let mut builder = Self::builder();
        if let Some(db) = db {
            builder = builder.backend(db);
        }
        builder.build()
    }

    pub fn namespace(&self) -> &'static str {
        SCHEMA_NAMESPACE
    }

    /// Persist `schema`, replacing any record with the same id
    pub fn store(&self, ctx: &OpContext, schema: &StoredSchema) -> SchemaStoreResult<()> {
        let result = self.store_inner(ctx, schema);
        self.report(ctx, Operation::Store, Some(&schema.id), &result);
        result
    }

    fn store_inner(&self, ctx: &OpContext, schema: &StoredSchema) -> SchemaStoreResult<()> {
        let id = schema.id.as_str();
        if id.is_empty() {
            return Err(SchemaStoreError::validation(
                Operation::Store,
                id,
                "could not store schema without an ID",
            ));
        }

        let bytes = schema
            .to_bytes()
            .map_err(|e| SchemaStoreError::serialization(Operation::Store, id, e))?;

        self.db
            .write(ctx, SCHEMA_NAMESPACE, id, &bytes)
            .map_err(|e| SchemaStoreError::backend(Operation::Store, Some(id), e))
    }

    /// Fetch the record stored under `id`
    pub fn get(&self, ctx: &OpContext, id: &str) -> SchemaStoreResult<StoredSchema> {
        let result = self.get_inner(ctx, id);
        self.report(ctx, Operation::Get, Some(id), &result);
        result
    }

    fn get_inner(&self, ctx: &OpContext, id: &str) -> SchemaStoreResult<StoredSchema> {
        let bytes = self
            .db
            .read(ctx, SCHEMA_NAMESPACE, id)
            .map_err(|e| SchemaStoreError::backend(Operation::Get, Some(id), e))?;

        // The backend reports a missing key as an empty value
        if bytes.is_empty() {
            return Err(SchemaStoreError::not_found(id));
        }

        StoredSchema::from_bytes(&bytes)
            .map_err(|e| SchemaStoreError::serialization(Operation::Get, id, e))
    }

    /// Every record that decodes, in backend scan order.
    ///
    /// Entries that fail to decode are skipped rather than failing the call.
    /// Only a failed scan is an error.
    pub fn list(&self, ctx: &OpContext) -> SchemaStoreResult<Vec<StoredSchema>> {
        let entries = match self.db.read_all(ctx, SCHEMA_NAMESPACE) {
            Ok(entries) => entries,
            Err(e) => {
                let err = SchemaStoreError::backend(Operation::List, None, e);
                self.observer.observe(&StoreEvent::failed(ctx.request_id, &err));
                return Err(err);
            }
        };

        let mut stored = Vec::with_capacity(entries.len());
        for bytes in &entries {
            match StoredSchema::from_bytes(bytes) {
                Ok(schema) => stored.push(schema),
                Err(e) => self
                    .observer
                    .observe(&StoreEvent::skipped(ctx.request_id, e.to_string())),
            }
        }

        self.observer.observe(
            &StoreEvent::success(Operation::List, ctx.request_id, None).with_count(stored.len()),
        );
        Ok(stored)
    }

    /// Delete the record under `id`.
    ///
    /// Deleting an absent id behaves however the backend does.
    pub fn delete(&self, ctx: &OpContext, id: &str) -> SchemaStoreResult<()> {
        let result = self
            .db
            .delete(ctx, SCHEMA_NAMESPACE, id)
            .map_err(|e| SchemaStoreError::backend(Operation::Delete, Some(id), e));
        self.report(ctx, Operation::Delete, Some(id), &result);
        result
    }

    fn report<T>(
        &self,
        ctx: &OpContext,
        operation: Operation,
        id: Option<&str>,
        result: &SchemaStoreResult<T>,
    ) {
        let event = match result {
            Ok(_) => StoreEvent::success(operation, ctx.request_id, id),
            Err(e) => StoreEvent::failed(ctx.request_id, e),
        };
        self.observer.observe(&event);
    }
}
