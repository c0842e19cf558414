use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use thiserror::Error;

use salonbook_core::{DocumentId, SalonId};
use salonbook_records::Collection;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: Collection, id: DocumentId },

    #[error("document {collection}/{id} already exists")]
    AlreadyExists { collection: Collection, id: DocumentId },

    /// The stored body no longer matches the one the caller read.
    #[error("document {collection}/{id} was modified concurrently")]
    Modified { collection: Collection, id: DocumentId },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Document storage keyed by (collection, id).
///
/// Bodies are raw JSON; typing and validation happen above this layer.
pub trait DocumentStore: Send + Sync {
    fn get(&self, collection: Collection, id: &DocumentId) -> Option<Value>;
    /// Insert a new document; fails if the key is taken.
    fn create(&self, collection: Collection, id: DocumentId, body: Value) -> Result<(), StoreError>;
    /// Replace an existing document whose current body equals `expected`.
    fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        expected: &Value,
        body: Value,
    ) -> Result<(), StoreError>;
    /// Delete a document whose current body equals `expected`.
    fn delete(&self, collection: Collection, id: &DocumentId, expected: &Value) -> Result<Value, StoreError>;
    /// All documents of a collection, ordered by id.
    fn list(&self, collection: Collection) -> Vec<(DocumentId, Value)>;

    /// Documents whose `salonId` field equals `salon_id`.
    fn list_for_salon(&self, collection: Collection, salon_id: &SalonId) -> Vec<(DocumentId, Value)> {
        self.list(collection)
            .into_iter()
            .filter(|(_, body)| body.get("salonId").and_then(Value::as_str) == Some(salon_id.as_str()))
            .collect()
    }
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn get(&self, collection: Collection, id: &DocumentId) -> Option<Value> {
        (**self).get(collection, id)
    }

    fn create(&self, collection: Collection, id: DocumentId, body: Value) -> Result<(), StoreError> {
        (**self).create(collection, id, body)
    }

    fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        expected: &Value,
        body: Value,
    ) -> Result<(), StoreError> {
        (**self).replace(collection, id, expected, body)
    }

    fn delete(&self, collection: Collection, id: &DocumentId, expected: &Value) -> Result<Value, StoreError> {
        (**self).delete(collection, id, expected)
    }

    fn list(&self, collection: Collection) -> Vec<(DocumentId, Value)> {
        (**self).list(collection)
    }

    fn list_for_salon(&self, collection: Collection, salon_id: &SalonId) -> Vec<(DocumentId, Value)> {
        (**self).list_for_salon(collection, salon_id)
    }
}

/// In-memory document store for tests/dev.
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    inner: RwLock<BTreeMap<(Collection, DocumentId), Value>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, collection: Collection, id: &DocumentId) -> Option<Value> {
        let map = self.inner.read().ok()?;
        map.get(&(collection, id.clone())).cloned()
    }

    fn create(&self, collection: Collection, id: DocumentId, body: Value) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let key = (collection, id);
        if map.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                collection,
                id: key.1,
            });
        }
        map.insert(key, body);
        Ok(())
    }

    fn replace(
        &self,
        collection: Collection,
        id: DocumentId,
        expected: &Value,
        body: Value,
    ) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        match map.get_mut(&(collection, id.clone())) {
            Some(slot) if *slot == *expected => {
                *slot = body;
                Ok(())
            }
            Some(_) => Err(StoreError::Modified { collection, id }),
            None => Err(StoreError::NotFound { collection, id }),
        }
    }

    fn delete(&self, collection: Collection, id: &DocumentId, expected: &Value) -> Result<Value, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let key = (collection, id.clone());
        match map.get(&key).map(|current| current == expected) {
            Some(true) => Ok(map.remove(&key).unwrap_or(Value::Null)),
            Some(false) => Err(StoreError::Modified {
                collection,
                id: id.clone(),
            }),
            None => Err(StoreError::NotFound {
                collection,
                id: id.clone(),
            }),
        }
    }

    fn list(&self, collection: Collection) -> Vec<(DocumentId, Value)> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.iter()
            .filter(|((c, _), _)| *c == collection)
            .map(|((_, id), body)| (id.clone(), body.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> DocumentId {
        DocumentId::parse(s).unwrap()
    }

    #[test]
    fn create_is_exclusive_and_replace_requires_existing() {
        let store = InMemoryDocumentStore::new();
        store.create(Collection::Clients, id("c1"), json!({ "salonId": "s1" })).unwrap();

        assert!(matches!(
            store.create(Collection::Clients, id("c1"), json!({})),
            Err(StoreError::AlreadyExists { .. })
        ));
        assert!(matches!(
            store.replace(Collection::Clients, id("c2"), &json!({}), json!({})),
            Err(StoreError::NotFound { .. })
        ));

        store
            .replace(Collection::Clients, id("c1"), &json!({ "salonId": "s1" }), json!({ "salonId": "s2" }))
            .unwrap();
        assert_eq!(store.get(Collection::Clients, &id("c1")).unwrap()["salonId"], "s2");
    }

    #[test]
    fn writes_based_on_a_stale_read_are_rejected() {
        let store = InMemoryDocumentStore::new();
        store.create(Collection::Clients, id("c1"), json!({ "salonId": "s1" })).unwrap();
        let seen = store.get(Collection::Clients, &id("c1")).unwrap();

        // Someone else moves the document after it was read.
        store
            .replace(Collection::Clients, id("c1"), &seen, json!({ "salonId": "s2" }))
            .unwrap();

        assert!(matches!(
            store.replace(Collection::Clients, id("c1"), &seen, json!({ "salonId": "s1", "n": 1 })),
            Err(StoreError::Modified { .. })
        ));
        assert!(matches!(
            store.delete(Collection::Clients, &id("c1"), &seen),
            Err(StoreError::Modified { .. })
        ));
        assert_eq!(store.get(Collection::Clients, &id("c1")).unwrap()["salonId"], "s2");
    }

    #[test]
    fn collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        store.create(Collection::Clients, id("x"), json!({ "n": 1 })).unwrap();
        store.create(Collection::Services, id("x"), json!({ "n": 2 })).unwrap();

        assert_eq!(store.list(Collection::Clients).len(), 1);
        assert_eq!(store.get(Collection::Services, &id("x")).unwrap()["n"], 2);
        assert!(store.get(Collection::Providers, &id("x")).is_none());
    }

    #[test]
    fn list_for_salon_filters_on_salon_id() {
        let store = InMemoryDocumentStore::new();
        store.create(Collection::Clients, id("a"), json!({ "salonId": "s1" })).unwrap();
        store.create(Collection::Clients, id("b"), json!({ "salonId": "s2" })).unwrap();
        store.create(Collection::Clients, id("c"), json!({ "salonId": null })).unwrap();

        let s1 = SalonId::parse("s1").unwrap();
        let rows = store.list_for_salon(Collection::Clients, &s1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, id("a"));
    }

    #[test]
    fn delete_returns_previous_body() {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.create(Collection::Sessions, id("s"), json!({ "path": "/" })).unwrap();
        let old = store.delete(Collection::Sessions, &id("s"), &json!({ "path": "/" })).unwrap();
        assert_eq!(old["path"], "/");
        assert!(store.is_empty());
        assert!(matches!(
            store.delete(Collection::Sessions, &id("s"), &old),
            Err(StoreError::NotFound { .. })
        ));
    }
}
