//! Process-local document store.
//!
//! Used by the test suite and whenever no `DATABASE_URL` is configured.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::StoreError;
use crate::filter::{Filter, Projection, lookup};
use crate::store::DocumentStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    // Insertion-ordered per collection.
    collections: RwLock<HashMap<String, Vec<(Uuid, Value)>>>,
    writes: AtomicUsize,
}

fn require_object(collection: &str, document: &Value) -> Result<(), StoreError> {
    if document.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidDocument {
            collection: collection.to_string(),
            reason: "document must be a JSON object".to_string(),
        })
    }
}

fn unique_value<'a>(
    collection: &str,
    unique_key: &str,
    document: &'a Value,
) -> Result<&'a Value, StoreError> {
    lookup(document, unique_key).ok_or_else(|| StoreError::InvalidDocument {
        collection: collection.to_string(),
        reason: format!("missing unique key {}", unique_key),
    })
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Number of successful `save` and `delete_by_id` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(doc_id, _)| *doc_id == id))
            .map(|(_, doc)| doc.clone()))
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|(_, doc)| filter.matches(doc)))
            .map(|(_, doc)| doc.clone()))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| filter.matches(doc))
                    .map(|(_, doc)| projection.apply(doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    #[instrument(skip(self, document))]
    async fn save(
        &self,
        collection: &str,
        id: Uuid,
        document: Value,
    ) -> Result<Value, StoreError> {
        require_object(collection, &document)?;

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(doc_id, _)| *doc_id == id) {
            Some((_, existing)) => *existing = document.clone(),
            None => docs.push((id, document.clone())),
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(store.collection = %collection, store.id = %id, "Document saved");

        Ok(document)
    }

    #[instrument(skip(self, document))]
    async fn insert_unique(
        &self,
        collection: &str,
        id: Uuid,
        unique_key: &str,
        document: Value,
    ) -> Result<Value, StoreError> {
        require_object(collection, &document)?;
        let key_value = unique_value(collection, unique_key, &document)?;

        // Held across the check and the push.
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        let taken = docs.iter().any(|(doc_id, doc)| {
            *doc_id == id || lookup(doc, unique_key) == Some(key_value)
        });
        if taken {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                key: unique_key.to_string(),
            });
        }

        docs.push((id, document.clone()));
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(store.collection = %collection, store.id = %id, "Document inserted");

        Ok(document)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections.get_mut(collection).and_then(|docs| {
            let position = docs.iter().position(|(doc_id, _)| *doc_id == id)?;
            Some(docs.remove(position).1)
        });
        if removed.is_some() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }

        Ok(removed)
    }
}
