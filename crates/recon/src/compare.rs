use serde_json::Value;

use crate::store::Document;

/// Two-tiered document comparison: exact raw-byte equality first (the
/// common case after a faithful copy), then deep structural equality over
/// the decoded values to tolerate field-order differences introduced by
/// storage-engine internals.
pub fn documents_match(a: &Document, b: &Document) -> bool {
    a.raw_bytes() == b.raw_bytes() || structurally_equal(a.value(), b.value())
}

/// Deep structural equality: objects compare order-insensitively (same key
/// set, recursively equal values); arrays compare order- and
/// length-sensitively; scalars compare by value.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, av)| b.get(key).is_some_and(|bv| structurally_equal(av, bv)))
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|(av, bv)| structurally_equal(av, bv))
        }
        _ => a == b,
    }
}
