use std::fmt;

use serde_json::Value;

use driftcheck_types::{Namespace, ObjectId};

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A document as returned by a store: the exact JSON text the store sent
/// (the canonical byte encoding) plus its decoded value. Byte equality is
/// the fast comparison path; the decoded value feeds the structural
/// fallback.
#[derive(Debug, Clone)]
pub struct Document {
    raw: Box<str>,
    decoded: Value,
}

impl Document {
    /// Build from the raw JSON text as received off the wire.
    pub fn from_json_text(raw: impl Into<Box<str>>) -> Result<Self, StoreError> {
        let raw = raw.into();
        let decoded = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Decode(format!("undecodable document: {e}")))?;
        Ok(Self { raw, decoded })
    }

    /// Build from an already-decoded value; the canonical encoding is its
    /// compact serialization.
    pub fn from_value(decoded: Value) -> Self {
        let raw = decoded.to_string().into_boxed_str();
        Self { raw, decoded }
    }

    pub fn raw_bytes(&self) -> &[u8] {
        self.raw.as_bytes()
    }

    pub fn value(&self) -> &Value {
        &self.decoded
    }
}

// ---------------------------------------------------------------------------
// Store capability
// ---------------------------------------------------------------------------

/// Single read-only capability every store exposes. `Ok(None)` is the
/// not-found case; errors are per-lookup and never abort the run.
pub trait DocumentStore {
    /// Short name used in diagnostics and `CheckResult::details`
    /// ("source", "dest").
    fn label(&self) -> &str;

    fn find_by_id(
        &self,
        namespace: &Namespace,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError>;
}

#[derive(Debug, Clone)]
pub enum StoreError {
    /// Lookup exceeded the client timeout.
    Timeout(String),
    /// Transport-level failure (refused, DNS, broken connection).
    Connect(String),
    /// Credentials rejected.
    Auth(String),
    /// The store answered with a failure status.
    Server { status: u16, message: String },
    /// The store answered but the payload was undecodable.
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(msg) => write!(f, "timeout: {msg}"),
            Self::Connect(msg) => write!(f, "connection error: {msg}"),
            Self::Auth(msg) => write!(f, "auth rejected: {msg}"),
            Self::Server { status, message } => write!(f, "server error ({status}): {message}"),
            Self::Decode(msg) => write!(f, "decode error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_text_keeps_exact_bytes() {
        let doc = Document::from_json_text(r#"{"b": 1,  "a": 2}"#).unwrap();
        assert_eq!(doc.raw_bytes(), br#"{"b": 1,  "a": 2}"#);
        assert_eq!(doc.value()["a"], 2);
    }

    #[test]
    fn from_json_text_rejects_garbage() {
        assert!(matches!(
            Document::from_json_text("{not json"),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn from_value_round_trips() {
        let doc = Document::from_value(serde_json::json!({"a": 1}));
        assert_eq!(doc.raw_bytes(), br#"{"a":1}"#);
    }
}
