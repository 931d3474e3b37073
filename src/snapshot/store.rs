//! Current Schema Store
//!
//! Holds the schema produced by the last successful scan. The slot is empty
//! until the first scan publishes, and every later publish replaces the whole
//! value. Readers get a shared handle to an immutable snapshot.
//!
//! Single writer: callers must ensure at most one scan publishes at a time.

use crate::error::AppError;
use crate::models::Schema;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Single-slot store for the current schema
pub struct SchemaStore {
    current: RwLock<Option<Arc<Schema>>>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Publish a schema, replacing any previous one
    pub async fn set(&self, schema: Schema) -> Arc<Schema> {
        let schema = Arc::new(schema);
        let mut current = self.current.write().await;
        *current = Some(schema.clone());

        tracing::info!(
            "Published schema: {} tables, {} relationships",
            schema.tables.len(),
            schema.relationships.len()
        );

        schema
    }

    /// The current schema, or `SchemaNotReady` before the first scan
    pub async fn get(&self) -> Result<Arc<Schema>, AppError> {
        self.current
            .read()
            .await
            .clone()
            .ok_or(AppError::SchemaNotReady)
    }

    pub async fn is_ready(&self) -> bool {
        self.current.read().await.is_some()
    }
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}
