/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An insert collided with an existing document on a unique key.
    #[error("Duplicate {key} in {collection}")]
    Duplicate { collection: String, key: String },

    #[error("Invalid document in {collection}: {reason}")]
    InvalidDocument { collection: String, reason: String },
}
