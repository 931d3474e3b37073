//! Catalog access
//!
//! The scanner only talks to the database through the [`Catalog`] trait:
//! metadata listings plus one raw query entry point used for row sampling.
//! Every call returns a finite, single-pass [`CatalogRows`] sequence.

pub mod postgres;
mod queries;

#[cfg(test)]
pub mod memory;

pub use postgres::PostgresCatalog;

use crate::error::AppError;
use async_trait::async_trait;

/// Column as listed by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    pub name: String,
    pub data_type: String,
}

/// Foreign key column imported by a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedKey {
    pub fk_column: String,
    pub ref_table: String,
    pub ref_column: String,
}

/// One sampled row: `(column name, text value)` in result column order
pub type SampleRow = Vec<(String, Option<String>)>;

/// Single-pass sequence of typed catalog rows.
///
/// Consumed by iteration; a result set cannot be replayed.
#[derive(Debug)]
pub struct CatalogRows<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> From<Vec<T>> for CatalogRows<T> {
    fn from(rows: Vec<T>) -> Self {
        Self {
            inner: rows.into_iter(),
        }
    }
}

impl<T> Iterator for CatalogRows<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Metadata and query access to a live database catalog.
///
/// Implementations acquire a connection per call and release it before
/// returning, on success and on error alike.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Database product name, e.g. "PostgreSQL" or "MySQL"
    async fn product_name(&self) -> Result<String, AppError>;

    /// Base tables owned by `owner` (schema)
    async fn list_tables(&self, owner: &str) -> Result<CatalogRows<String>, AppError>;

    /// Columns of a table in ordinal order
    async fn list_columns(&self, table: &str) -> Result<CatalogRows<CatalogColumn>, AppError>;

    /// Primary key column names of a table
    async fn list_primary_keys(&self, table: &str) -> Result<CatalogRows<String>, AppError>;

    /// Foreign keys declared on a table
    async fn list_imported_keys(&self, table: &str) -> Result<CatalogRows<ImportedKey>, AppError>;

    /// Run a read-only query and return every row as text
    async fn execute_query(&self, sql: &str) -> Result<CatalogRows<SampleRow>, AppError>;
}
