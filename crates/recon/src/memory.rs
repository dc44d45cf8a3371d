use std::cell::Cell;
use std::collections::BTreeMap;

use driftcheck_types::{Namespace, ObjectId};

use crate::store::{Document, DocumentStore, StoreError};

/// In-memory document store used by tests and offline fixture replays.
/// Lookups can be made to fail per key to exercise error paths.
pub struct MemoryStore {
    label: String,
    docs: BTreeMap<(String, ObjectId), Document>,
    failures: BTreeMap<(String, ObjectId), StoreError>,
    lookups: Cell<usize>,
}

impl MemoryStore {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            docs: BTreeMap::new(),
            failures: BTreeMap::new(),
            lookups: Cell::new(0),
        }
    }

    pub fn insert(&mut self, namespace: &Namespace, id: ObjectId, doc: Document) {
        self.docs.insert((namespace.to_string(), id), doc);
    }

    /// Make every lookup for this key return the given error.
    pub fn fail(&mut self, namespace: &Namespace, id: ObjectId, err: StoreError) {
        self.failures.insert((namespace.to_string(), id), err);
    }

    /// Number of `find_by_id` calls made so far.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl DocumentStore for MemoryStore {
    fn label(&self) -> &str {
        &self.label
    }

    fn find_by_id(
        &self,
        namespace: &Namespace,
        id: &ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        self.lookups.set(self.lookups.get() + 1);
        let key = (namespace.to_string(), *id);
        if let Some(err) = self.failures.get(&key) {
            return Err(err.clone());
        }
        Ok(self.docs.get(&key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn miss_then_hit() {
        let ns = Namespace::new("db", "col");
        let id = ObjectId::from_bytes([1; 12]);
        let mut store = MemoryStore::new("source");
        assert!(store.find_by_id(&ns, &id).unwrap().is_none());

        store.insert(&ns, id, Document::from_value(json!({"x": 1})));
        let doc = store.find_by_id(&ns, &id).unwrap().unwrap();
        assert_eq!(doc.value()["x"], 1);
        assert_eq!(store.lookups(), 2);
    }

    #[test]
    fn injected_failure_surfaces() {
        let ns = Namespace::new("db", "col");
        let id = ObjectId::from_bytes([2; 12]);
        let mut store = MemoryStore::new("dest");
        store.fail(&ns, id, StoreError::Connect("refused".into()));
        assert!(matches!(
            store.find_by_id(&ns, &id),
            Err(StoreError::Connect(_))
        ));
    }

    #[test]
    fn namespaces_are_disjoint() {
        let id = ObjectId::from_bytes([3; 12]);
        let mut store = MemoryStore::new("source");
        store.insert(
            &Namespace::new("db", "a"),
            id,
            Document::from_value(json!({})),
        );
        assert!(store
            .find_by_id(&Namespace::new("db", "b"), &id)
            .unwrap()
            .is_none());
    }
}
