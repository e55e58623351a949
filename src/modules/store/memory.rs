use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoreResult};

type Collection = BTreeMap<String, Value>;

/// In-process document store
///
/// Keys are UUID v7 strings, so key order follows creation order like the
/// generated keys of the Realtime Database. The lock is held for one
/// operation only.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Drop `null` fields, the way the database never stores them
fn without_nulls(document: Value) -> Value {
    match document {
        Value::Object(map) => Value::Object(map.into_iter().filter(|(_, v)| !v.is_null()).collect()),
        other => other,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Value)>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn push(&self, collection: &str, document: Value) -> StoreResult<String> {
        let id = Uuid::now_v7().simple().to_string();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), without_nulls(document));
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if document.is_null() {
            docs.remove(id);
        } else {
            docs.insert(id.to_string(), without_nulls(document));
        }
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        let entry = docs
            .entry(id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }

        let now_empty = match entry {
            Value::Object(document) => {
                for (key, value) in fields {
                    if value.is_null() {
                        document.remove(&key);
                    } else {
                        document.insert(key, value);
                    }
                }
                document.is_empty()
            }
            _ => false,
        };

        if now_empty {
            docs.remove(id);
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_push_then_get() {
        let store = MemoryStore::new();
        let id = store
            .push("donations", json!({ "donationName": "Rice" }))
            .await
            .unwrap();

        let doc = store.get("donations", &id).await.unwrap();
        assert_eq!(doc, Some(json!({ "donationName": "Rice" })));
        assert_eq!(store.get("donations", "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_push_generates_distinct_ordered_keys() {
        let store = MemoryStore::new();
        let first = store.push("donations", json!({ "n": 1 })).await.unwrap();
        let second = store.push("donations", json!({ "n": 2 })).await.unwrap();

        assert_ne!(first, second);
        let keys: Vec<String> = store
            .list("donations")
            .await
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![first, second]);
    }

    #[tokio::test]
    async fn test_update_merges_and_null_deletes() {
        let store = MemoryStore::new();
        let id = store
            .push("donations", json!({ "a": 1, "b": 2, "reservedBy": "u1" }))
            .await
            .unwrap();

        let mut fields = Map::new();
        fields.insert("b".to_string(), json!(3));
        fields.insert("reservedBy".to_string(), Value::Null);
        store.update("donations", &id, fields).await.unwrap();

        let doc = store.get("donations", &id).await.unwrap().unwrap();
        assert_eq!(doc, json!({ "a": 1, "b": 3 }));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.push("donations", json!({ "a": 1 })).await.unwrap();

        store.remove("donations", &id).await.unwrap();
        store.remove("donations", &id).await.unwrap();
        store.remove("never-created", "x").await.unwrap();

        assert!(store.list("donations").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_push_drops_null_fields() {
        let store = MemoryStore::new();
        let id = store
            .push("donations", json!({ "a": 1, "reservedBy": null }))
            .await
            .unwrap();

        let doc = store.get("donations", &id).await.unwrap().unwrap();
        assert_eq!(doc, json!({ "a": 1 }));
    }
}
