use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;
use crate::filter::{Filter, Projection};

/// A collection-oriented JSON document store.
///
/// Documents are JSON objects keyed by `(collection, id)`. Implementations own
/// their concurrency control; callers never lock around them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError>;

    async fn find_one(&self, collection: &str, filter: &Filter)
    -> Result<Option<Value>, StoreError>;

    /// Documents matching `filter`, oldest first, trimmed by `projection`.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Vec<Value>, StoreError>;

    /// Inserts or replaces the document stored under `id`.
    async fn save(&self, collection: &str, id: Uuid, document: Value)
    -> Result<Value, StoreError>;

    /// Inserts a new document unless one with the same `id`, or the same
    /// value at the dotted path `unique_key`, already exists. The check and
    /// the insert are atomic; a collision is [`StoreError::Duplicate`].
    async fn insert_unique(
        &self,
        collection: &str,
        id: Uuid,
        unique_key: &str,
        document: Value,
    ) -> Result<Value, StoreError>;

    /// Removes the document and returns it, if it existed.
    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError>;
}
