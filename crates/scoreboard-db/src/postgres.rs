//! PostgreSQL document store.
//!
//! All collections share one `documents` table holding JSONB bodies; filters
//! become JSON containment (`@>`) queries. The schema ships as embedded
//! migrations applied by [`PgStore::migrate`]; they include a unique index on
//! user emails, which makes [`DocumentStore::insert_unique`] race-free for
//! that key.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::StoreError;
use crate::filter::{Filter, Projection, lookup};
use crate::store::DocumentStore;

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool against `database_url`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the database cannot be reached.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Document store migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    #[instrument(skip(self), fields(store.operation = "FIND_BY_ID"))]
    async fn find_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(data)| data))
    }

    #[instrument(skip(self), fields(store.operation = "FIND_ONE"))]
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Value>>(
            r#"SELECT data FROM documents
               WHERE collection = $1 AND data @> $2
               ORDER BY created_at
               LIMIT 1"#,
        )
        .bind(collection)
        .bind(Json(filter.to_containment()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(data)| data))
    }

    #[instrument(skip(self), fields(store.operation = "FIND"))]
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Vec<Value>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Value>>(
            r#"SELECT data FROM documents
               WHERE collection = $1 AND data @> $2
               ORDER BY created_at"#,
        )
        .bind(collection)
        .bind(Json(filter.to_containment()))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|Json(data)| projection.apply(data))
            .collect())
    }

    #[instrument(skip(self, document), fields(store.operation = "UPSERT"))]
    async fn save(
        &self,
        collection: &str,
        id: Uuid,
        document: Value,
    ) -> Result<Value, StoreError> {
        if !document.is_object() {
            return Err(StoreError::InvalidDocument {
                collection: collection.to_string(),
                reason: "document must be a JSON object".to_string(),
            });
        }

        let Json(saved) = sqlx::query_scalar::<_, Json<Value>>(
            r#"INSERT INTO documents (collection, id, data)
               VALUES ($1, $2, $3)
               ON CONFLICT (collection, id)
               DO UPDATE SET data = EXCLUDED.data, updated_at = now()
               RETURNING data"#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(document))
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    #[instrument(skip(self, document), fields(store.operation = "INSERT_UNIQUE"))]
    async fn insert_unique(
        &self,
        collection: &str,
        id: Uuid,
        unique_key: &str,
        document: Value,
    ) -> Result<Value, StoreError> {
        if !document.is_object() {
            return Err(StoreError::InvalidDocument {
                collection: collection.to_string(),
                reason: "document must be a JSON object".to_string(),
            });
        }
        let Some(key_value) = lookup(&document, unique_key).cloned() else {
            return Err(StoreError::InvalidDocument {
                collection: collection.to_string(),
                reason: format!("missing unique key {}", unique_key),
            });
        };
        let taken = Filter::all().field(unique_key, key_value);

        // DO NOTHING covers both the primary key and any unique index.
        let row = sqlx::query_scalar::<_, Json<Value>>(
            r#"INSERT INTO documents (collection, id, data)
               SELECT $1, $2, $3
               WHERE NOT EXISTS (
                   SELECT 1 FROM documents WHERE collection = $1 AND data @> $4
               )
               ON CONFLICT DO NOTHING
               RETURNING data"#,
        )
        .bind(collection)
        .bind(id)
        .bind(Json(document))
        .bind(Json(taken.to_containment()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(|Json(data)| data)
            .ok_or_else(|| StoreError::Duplicate {
                collection: collection.to_string(),
                key: unique_key.to_string(),
            })
    }

    #[instrument(skip(self), fields(store.operation = "DELETE"))]
    async fn delete_by_id(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Value>>(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 RETURNING data",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(data)| data))
    }
}
