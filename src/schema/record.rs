//! Stored schema record
//!
//! Persisted as one JSON object per id:
//!
//! ```json
//! {"id": "...", "schema": { ... }, "token": "..."}
//! ```
//!
//! `token` is omitted entirely when unset. Unknown fields are ignored on read
//! so records written by newer versions still decode.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The schema definition itself. Opaque to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDocument(Value);

impl SchemaDocument {
    pub fn new(document: Value) -> Self {
        Self(document)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for SchemaDocument {
    fn from(document: Value) -> Self {
        Self(document)
    }
}

/// Signed artifact attached to a schema (compact JWT).
///
/// Persisted verbatim; never parsed or verified here.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedToken(String);

impl SignedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SignedToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SignedToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

// Keep credentials out of debug output
impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedToken({} bytes)", self.0.len())
    }
}

/// A schema record as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSchema {
    /// Record id; also the storage key
    pub id: String,

    #[serde(rename = "schema")]
    pub document: SchemaDocument,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<SignedToken>,
}

impl StoredSchema {
    /// Create a record with no token attached
    pub fn new(id: impl Into<String>, document: impl Into<SchemaDocument>) -> Self {
        Self {
            id: id.into(),
            document: document.into(),
            token: None,
        }
    }

    /// Attach a signed token
    pub fn with_token(mut self, token: impl Into<SignedToken>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn email_schema() -> Value {
        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "type": "object",
            "properties": {"emailAddress": {"type": "string", "format": "email"}},
            "required": ["emailAddress"]
        })
    }

    #[test]
    fn test_token_omitted_when_absent() {
        let record = StoredSchema::new("email", email_schema());
        let encoded: Value = serde_json::from_slice(&record.to_bytes().unwrap()).unwrap();

        assert_eq!(encoded["id"], "email");
        assert_eq!(encoded["schema"]["type"], "object");
        assert!(encoded.get("token").is_none());
    }

    #[test]
    fn test_token_encoded_as_string() {
        let record = StoredSchema::new("email", email_schema()).with_token("aaa.bbb.ccc");
        let encoded: Value = serde_json::from_slice(&record.to_bytes().unwrap()).unwrap();

        assert_eq!(encoded["token"], "aaa.bbb.ccc");
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let bytes = br#"{"id":"x","schema":{"type":"string"},"revision":7}"#;
        let record = StoredSchema::from_bytes(bytes).unwrap();

        assert_eq!(record.id, "x");
        assert!(record.token.is_none());
    }

    #[test]
    fn test_decode_accepts_null_token() {
        let bytes = br#"{"id":"x","schema":{},"token":null}"#;
        assert!(StoredSchema::from_bytes(bytes).unwrap().token.is_none());
    }

    #[test]
    fn test_decode_requires_schema() {
        assert!(StoredSchema::from_bytes(br#"{"id":"x"}"#).is_err());
    }

    #[test]
    fn test_token_debug_hides_value() {
        let token = SignedToken::new("secret.payload.sig");
        let debug = format!("{:?}", token);
        assert!(!debug.contains("secret"));
    }
}
