//! In-memory document store.
//!
//! Backs tests and the demo binary. Collections are plain maps behind a
//! mutex; semantics match [`SqliteStore`](crate::sqlite::SqliteStore).

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use healthconnect_core::error::HealthConnectError;

use crate::document::{Document, DocumentStore};

/// In-memory [`DocumentStore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collections<F, T>(&self, f: F) -> Result<T, HealthConnectError>
    where
        F: FnOnce(&mut HashMap<String, BTreeMap<String, Value>>) -> T,
    {
        let mut collections = self
            .collections
            .lock()
            .map_err(|e| HealthConnectError::Storage(format!("store lock poisoned: {}", e)))?;
        Ok(f(&mut collections))
    }
}

/// True when every `(field, value)` filter matches the document's top-level
/// fields exactly.
fn matches_filters(body: &Value, filters: &[(&str, Value)]) -> bool {
    filters
        .iter()
        .all(|(field, expected)| body.get(*field) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<(), HealthConnectError> {
        self.with_collections(|collections| {
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), document);
        })
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, HealthConnectError> {
        self.with_collections(|collections| {
            collections
                .get(collection)
                .and_then(|docs| docs.get(id))
                .cloned()
        })
    }

    async fn find_eq(
        &self,
        collection: &str,
        filters: &[(&str, Value)],
    ) -> Result<Vec<Document>, HealthConnectError> {
        self.with_collections(|collections| {
            collections
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|(_, body)| matches_filters(body, filters))
                        .map(|(id, body)| Document {
                            id: id.clone(),
                            body: body.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), HealthConnectError> {
        self.with_collections(|collections| {
            if let Some(docs) = collections.get_mut(collection) {
                docs.remove(id);
            }
        })
    }
}
