//! PostgreSQL catalog backed by a `deadpool-postgres` pool
//!
//! Each call checks a client out of the pool and drops it before returning,
//! so no connection outlives the listing or query it served.

use super::queries::{
    LIST_COLUMNS, LIST_IMPORTED_KEYS, LIST_PRIMARY_KEYS, LIST_TABLES, PRODUCT_VERSION,
};
use super::{Catalog, CatalogColumn, CatalogRows, ImportedKey, SampleRow};
use crate::error::AppError;
use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::SimpleQueryMessage;
use tracing::debug;

/// Catalog over one PostgreSQL schema
pub struct PostgresCatalog {
    pool: Pool,
    /// Schema that per-table listings are resolved in
    schema: String,
}

impl PostgresCatalog {
    pub fn new(pool: Pool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    async fn product_name(&self) -> Result<String, AppError> {
        let client = self.pool.get().await?;
        let row = client.query_one(PRODUCT_VERSION, &[]).await?;
        Ok(row.get(0))
    }

    async fn list_tables(&self, owner: &str) -> Result<CatalogRows<String>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(LIST_TABLES, &[&owner]).await?;

        debug!("Catalog lists {} tables in schema {}", rows.len(), owner);

        Ok(rows
            .iter()
            .map(|row| row.get::<_, String>("table_name"))
            .collect::<Vec<_>>()
            .into())
    }

    async fn list_columns(&self, table: &str) -> Result<CatalogRows<CatalogColumn>, AppError> {
        let client = self.pool.get().await?;
        let rows = client.query(LIST_COLUMNS, &[&self.schema, &table]).await?;

        Ok(rows
            .iter()
            .map(|row| CatalogColumn {
                name: row.get("column_name"),
                data_type: row.get("data_type"),
            })
            .collect::<Vec<_>>()
            .into())
    }

    async fn list_primary_keys(&self, table: &str) -> Result<CatalogRows<String>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(LIST_PRIMARY_KEYS, &[&self.schema, &table])
            .await?;

        Ok(rows
            .iter()
            .map(|row| row.get::<_, String>("column_name"))
            .collect::<Vec<_>>()
            .into())
    }

    async fn list_imported_keys(&self, table: &str) -> Result<CatalogRows<ImportedKey>, AppError> {
        let client = self.pool.get().await?;
        let rows = client
            .query(LIST_IMPORTED_KEYS, &[&self.schema, &table])
            .await?;

        Ok(rows
            .iter()
            .map(|row| ImportedKey {
                fk_column: row.get("fk_column"),
                ref_table: row.get("ref_table"),
                ref_column: row.get("ref_column"),
            })
            .collect::<Vec<_>>()
            .into())
    }

    async fn execute_query(&self, sql: &str) -> Result<CatalogRows<SampleRow>, AppError> {
        let client = self.pool.get().await?;

        // The simple query protocol returns every value in text form,
        // whatever the column type.
        let messages = client.simple_query(sql).await?;

        let mut rows = Vec::new();
        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                let sample: SampleRow = row
                    .columns()
                    .iter()
                    .enumerate()
                    .map(|(i, col)| (col.name().to_string(), row.get(i).map(str::to_string)))
                    .collect();
                rows.push(sample);
            }
        }

        Ok(rows.into())
    }
}
