//! Schema Store Invariant Tests
//!
//! Behavior every backend must give the facade:
//! - store then get returns the same record
//! - get of an absent or deleted id is NotFound
//! - empty ids never reach the backend
//! - a second store under an id replaces the first
//! - list returns the decodable records and skips the rest
//! - list of an empty namespace is empty, not an error

use std::sync::Arc;

use jsonwebtoken::{encode, EncodingKey, Header};
use schemastore::kv::{InMemoryStore, KeyValueStore, LocalStore, OpContext};
use schemastore::schema::{
    ErrorKind, EventOutcome, MemoryObserver, SchemaStorage, StoredSchema, SCHEMA_NAMESPACE,
};
use serde::Serialize;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

#[derive(Serialize)]
struct SchemaClaims {
    iss: String,
    sub: String,
    iat: i64,
}

fn signed_token(id: &str) -> String {
    let claims = SchemaClaims {
        iss: "did:example:issuer".to_string(),
        sub: id.to_string(),
        iat: 1_700_000_000,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-signing-key"),
    )
    .unwrap()
}

fn email_schema(id: &str) -> StoredSchema {
    StoredSchema::new(
        id,
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "name": "Email Address",
            "type": "object",
            "properties": {
                "credentialSubject": {
                    "type": "object",
                    "properties": {"emailAddress": {"type": "string", "format": "email"}},
                    "required": ["emailAddress"]
                }
            }
        }),
    )
}

/// Both backends; the temp dir guard keeps the local one alive
fn backends() -> Vec<(Option<TempDir>, Arc<dyn KeyValueStore>)> {
    let temp = TempDir::new().unwrap();
    let memory: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let local: Arc<dyn KeyValueStore> =
        Arc::new(LocalStore::new(temp.path()).with_sync_writes(false));
    vec![(None, memory), (Some(temp), local)]
}

fn storage_over(db: Arc<dyn KeyValueStore>) -> SchemaStorage {
    SchemaStorage::new(Some(db)).unwrap()
}

// =============================================================================
// Round Trip
// =============================================================================

#[test]
fn test_round_trip_without_token() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);
        let ctx = OpContext::background();
        let record = email_schema("email-v1");

        storage.store(&ctx, &record).unwrap();
        assert_eq!(storage.get(&ctx, "email-v1").unwrap(), record);
    }
}

#[test]
fn test_round_trip_preserves_signed_token() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);
        let ctx = OpContext::background();
        let token = signed_token("email-v1");
        let record = email_schema("email-v1").with_token(token.clone());

        storage.store(&ctx, &record).unwrap();
        let fetched = storage.get(&ctx, "email-v1").unwrap();

        assert_eq!(fetched.token.as_ref().map(|t| t.as_str()), Some(token.as_str()));
        assert_eq!(fetched, record);
    }
}

#[test]
fn test_long_uri_ids_round_trip() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);
        let ctx = OpContext::background();
        let id = format!("https://example.com/schemas/{}", "a".repeat(172));
        assert_eq!(id.len(), 200);

        let record = email_schema(&id).with_token(signed_token(&id));
        storage.store(&ctx, &record).unwrap();
        assert_eq!(storage.get(&ctx, &id).unwrap(), record);
        assert_eq!(storage.list(&ctx).unwrap(), vec![record]);

        storage.delete(&ctx, &id).unwrap();
        assert_eq!(storage.get(&ctx, &id).unwrap_err().kind(), ErrorKind::NotFound);
    }
}

#[test]
fn test_uri_ids_round_trip() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);
        let ctx = OpContext::background();
        let id = "https://example.com/schemas/email/v1#draft";

        storage.store(&ctx, &email_schema(id)).unwrap();
        assert_eq!(storage.get(&ctx, id).unwrap().id, id);
    }
}

// =============================================================================
// Not Found
// =============================================================================

#[test]
fn test_get_never_stored_is_not_found() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);

        let err = storage.get(&OpContext::background(), "missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.id(), Some("missing"));
    }
}

#[test]
fn test_get_after_delete_is_not_found() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);
        let ctx = OpContext::background();

        storage.store(&ctx, &email_schema("gone")).unwrap();
        storage.delete(&ctx, "gone").unwrap();

        assert_eq!(storage.get(&ctx, "gone").unwrap_err().kind(), ErrorKind::NotFound);
    }
}

// =============================================================================
// Empty Id Rejection
// =============================================================================

#[test]
fn test_empty_id_rejected_without_write() {
    for (_guard, db) in backends() {
        let storage = storage_over(db.clone());
        let ctx = OpContext::background();

        let err = storage.store(&ctx, &email_schema("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        assert!(db.read_all(&ctx, SCHEMA_NAMESPACE).unwrap().is_empty());
        assert!(storage.list(&ctx).unwrap().is_empty());
    }
}

// =============================================================================
// Overwrite
// =============================================================================

#[test]
fn test_second_store_replaces_first() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);
        let ctx = OpContext::background();

        let first = email_schema("x").with_token(signed_token("x"));
        let second = StoredSchema::new("x", json!({"type": "string"}));

        storage.store(&ctx, &first).unwrap();
        storage.store(&ctx, &second).unwrap();

        let fetched = storage.get(&ctx, "x").unwrap();
        assert_eq!(fetched, second);
        assert!(fetched.token.is_none());
        assert_eq!(storage.list(&ctx).unwrap().len(), 1);
    }
}

// =============================================================================
// Best-Effort Listing
// =============================================================================

#[test]
fn test_list_returns_only_valid_records_in_scan_order() {
    for (_guard, db) in backends() {
        let observer = MemoryObserver::new();
        let storage = SchemaStorage::builder()
            .backend(db.clone())
            .observer(Arc::new(observer.clone()))
            .build()
            .unwrap();
        let ctx = OpContext::background();

        for id in ["a", "c", "e"] {
            storage.store(&ctx, &email_schema(id)).unwrap();
        }
        db.write(&ctx, SCHEMA_NAMESPACE, "b", b"\x00\x01 not json").unwrap();
        db.write(&ctx, SCHEMA_NAMESPACE, "d", br#"{"id":"d"}"#).unwrap();

        let ids: Vec<_> = storage
            .list(&ctx)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();

        // Both backends scan in key order
        assert_eq!(ids, vec!["a", "c", "e"]);

        let skipped = observer
            .events()
            .into_iter()
            .filter(|e| e.outcome == EventOutcome::Skipped)
            .count();
        assert_eq!(skipped, 2);
    }
}

#[test]
fn test_list_reads_records_from_newer_writers() {
    for (_guard, db) in backends() {
        let storage = storage_over(db.clone());
        let ctx = OpContext::background();

        let newer = br#"{"id":"n","schema":{"type":"object"},"revision":3,"labels":["x"]}"#;
        db.write(&ctx, SCHEMA_NAMESPACE, "n", newer).unwrap();

        let listed = storage.list(&ctx).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "n");
    }
}

#[test]
fn test_list_empty_namespace() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);
        assert!(storage.list(&OpContext::background()).unwrap().is_empty());
    }
}

#[test]
fn test_list_ignores_other_namespaces() {
    for (_guard, db) in backends() {
        let storage = storage_over(db.clone());
        let ctx = OpContext::background();

        let foreign = serde_json::to_vec(&email_schema("foreign")).unwrap();
        db.write(&ctx, "credential", "foreign", &foreign).unwrap();

        assert!(storage.list(&ctx).unwrap().is_empty());
        assert_eq!(storage.get(&ctx, "foreign").unwrap_err().kind(), ErrorKind::NotFound);
    }
}

#[test]
fn test_deleted_record_never_listed() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);
        let ctx = OpContext::background();

        storage.store(&ctx, &email_schema("x")).unwrap();
        storage.store(&ctx, &email_schema("y")).unwrap();
        storage.delete(&ctx, "y").unwrap();

        let listed = storage.list(&ctx).unwrap();
        assert!(listed.iter().all(|s| s.id != "y"));
        assert_eq!(listed.len(), 1);
    }
}

// =============================================================================
// Delete Semantics
// =============================================================================

#[test]
fn test_delete_of_absent_id_follows_backend() {
    let ctx = OpContext::background();

    let memory = storage_over(Arc::new(InMemoryStore::new()));
    assert!(memory.delete(&ctx, "ghost").is_ok());

    let temp = TempDir::new().unwrap();
    let local = storage_over(Arc::new(LocalStore::new(temp.path())));
    let err = local.delete(&ctx, "ghost").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendError);
    assert_eq!(err.id(), Some("ghost"));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_shared_facade_across_threads() {
    let storage = storage_over(Arc::new(InMemoryStore::new()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let storage = storage.clone();
            std::thread::spawn(move || {
                let ctx = OpContext::background();
                let id = format!("schema-{}", i);
                storage.store(&ctx, &email_schema(&id)).unwrap();
                storage.get(&ctx, &id).unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(storage.list(&OpContext::background()).unwrap().len(), 8);
}

#[test]
fn test_concurrent_stores_to_one_id() {
    for (_guard, db) in backends() {
        let storage = storage_over(db);
        let large = email_schema("x").with_token(signed_token("x"));
        let small = StoredSchema::new("x", json!({"type": "string"}));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let storage = storage.clone();
                let record = if i % 2 == 0 { large.clone() } else { small.clone() };
                std::thread::spawn(move || {
                    let ctx = OpContext::background();
                    for _ in 0..50 {
                        storage.store(&ctx, &record).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let ctx = OpContext::background();
        let fetched = storage.get(&ctx, "x").unwrap();
        assert!(fetched == large || fetched == small);
        assert_eq!(storage.list(&ctx).unwrap().len(), 1);
    }
}
