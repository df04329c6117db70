//! Typed access to one collection of a [`DocumentStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::StoreError;
use crate::filter::{Filter, Projection};
use crate::store::DocumentStore;

/// An entity stored as one JSON document.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    /// Called just before the document is written.
    fn before_save(&mut self) {}
}

pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Repository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<T>, StoreError> {
        self.store
            .find_one(T::COLLECTION, filter)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        self.store
            .find(T::COLLECTION, filter, &Projection::All)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Like [`Repository::find`], decoding each trimmed document as `P`.
    pub async fn find_projected<P: DeserializeOwned>(
        &self,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Vec<P>, StoreError> {
        self.store
            .find(T::COLLECTION, filter, projection)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn save(&self, mut document: T) -> Result<T, StoreError> {
        document.before_save();
        let id = document.id();
        let value = serde_json::to_value(&document)?;
        let saved = self.store.save(T::COLLECTION, id, value).await?;
        decode(saved)
    }

    /// Like [`Repository::save`] for a new document, failing with
    /// [`StoreError::Duplicate`] if `unique_key` is already taken.
    pub async fn insert_unique(&self, mut document: T, unique_key: &str) -> Result<T, StoreError> {
        document.before_save();
        let id = document.id();
        let value = serde_json::to_value(&document)?;
        let saved = self
            .store
            .insert_unique(T::COLLECTION, id, unique_key, value)
            .await?;
        decode(saved)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        self.store
            .delete_by_id(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }
}

fn decode<P: DeserializeOwned>(value: serde_json::Value) -> Result<P, StoreError> {
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        title: String,
        #[serde(default)]
        saves: u32,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> Uuid {
            self.id
        }

        fn before_save(&mut self) {
            self.saves += 1;
        }
    }

    #[derive(Debug, Deserialize)]
    struct NoteTitle {
        title: String,
    }

    #[tokio::test]
    async fn test_typed_round_trip_runs_save_hook() {
        let repo: Repository<Note> = Repository::new(Arc::new(MemoryStore::new()));
        let note = Note {
            id: Uuid::new_v4(),
            title: "hello".to_string(),
            saves: 0,
        };

        let saved = repo.save(note.clone()).await.unwrap();
        assert_eq!(saved.saves, 1);

        let saved = repo.save(saved).await.unwrap();
        assert_eq!(saved.saves, 2);

        let found = repo.find_by_id(note.id).await.unwrap().unwrap();
        assert_eq!(found, saved);
    }

    #[tokio::test]
    async fn test_insert_unique_runs_save_hook_and_rejects_taken_title() {
        let repo: Repository<Note> = Repository::new(Arc::new(MemoryStore::new()));
        let note = Note {
            id: Uuid::new_v4(),
            title: "hello".to_string(),
            saves: 0,
        };

        let saved = repo.insert_unique(note, "title").await.unwrap();
        assert_eq!(saved.saves, 1);

        let clash = Note {
            id: Uuid::new_v4(),
            title: "hello".to_string(),
            saves: 0,
        };
        assert!(matches!(
            repo.insert_unique(clash, "title").await,
            Err(StoreError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_find_projected_decodes_partial_shape() {
        let repo: Repository<Note> = Repository::new(Arc::new(MemoryStore::new()));
        for title in ["a", "b"] {
            repo.save(Note {
                id: Uuid::new_v4(),
                title: title.to_string(),
                saves: 0,
            })
            .await
            .unwrap();
        }

        let titles: Vec<NoteTitle> = repo
            .find_projected(&Filter::all(), &Projection::include(["title"]))
            .await
            .unwrap();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].title, "a");
    }
}
