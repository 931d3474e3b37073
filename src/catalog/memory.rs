//! In-memory catalog for tests
//!
//! Serves predefined tables, keys and sample rows without a database, and
//! can simulate a failing catalog or failing sample queries per table.

use super::{Catalog, CatalogColumn, CatalogRows, ImportedKey, SampleRow};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default, Clone)]
struct StaticTable {
    columns: Vec<CatalogColumn>,
    primary_keys: Vec<String>,
    imported_keys: Vec<ImportedKey>,
    rows: Vec<SampleRow>,
}

/// Catalog holding a fixed snapshot
pub struct StaticCatalog {
    product: String,
    order: Vec<String>,
    tables: HashMap<String, StaticTable>,
    failing_samples: HashSet<String>,
    fail_metadata: bool,
    fail_product: bool,
    queries: AtomicUsize,
    executed: Mutex<Vec<String>>,
}

impl StaticCatalog {
    pub fn new(product: &str) -> Self {
        Self {
            product: product.to_string(),
            order: Vec::new(),
            tables: HashMap::new(),
            failing_samples: HashSet::new(),
            fail_metadata: false,
            fail_product: false,
            queries: AtomicUsize::new(0),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Add a table; columns are `(name, type)` pairs
    pub fn table(mut self, name: &str, columns: &[(&str, &str)], primary_keys: &[&str]) -> Self {
        self.order.push(name.to_string());
        self.tables.insert(
            name.to_string(),
            StaticTable {
                columns: columns
                    .iter()
                    .map(|(n, t)| CatalogColumn {
                        name: n.to_string(),
                        data_type: t.to_string(),
                    })
                    .collect(),
                primary_keys: primary_keys.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        );
        self
    }

    pub fn foreign_key(
        mut self,
        table: &str,
        column: &str,
        ref_table: &str,
        ref_column: &str,
    ) -> Self {
        if let Some(t) = self.tables.get_mut(table) {
            t.imported_keys.push(ImportedKey {
                fk_column: column.to_string(),
                ref_table: ref_table.to_string(),
                ref_column: ref_column.to_string(),
            });
        }
        self
    }

    /// Add one sample row; `None` values are SQL NULLs
    pub fn row(mut self, table: &str, values: &[(&str, Option<&str>)]) -> Self {
        if let Some(t) = self.tables.get_mut(table) {
            t.rows.push(
                values
                    .iter()
                    .map(|(c, v)| (c.to_string(), v.map(str::to_string)))
                    .collect(),
            );
        }
        self
    }

    pub fn failing_sample(mut self, table: &str) -> Self {
        self.failing_samples.insert(table.to_string());
        self
    }

    pub fn with_metadata_failure(mut self) -> Self {
        self.fail_metadata = true;
        self
    }

    /// Fail only the product name lookup
    pub fn with_product_failure(mut self) -> Self {
        self.fail_product = true;
        self
    }

    /// Number of sample queries executed so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// SQL of every sample query, in execution order
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    fn check_metadata(&self) -> Result<(), AppError> {
        if self.fail_metadata {
            return Err(AppError::ConnectionFailure(
                "simulated catalog failure".to_string(),
            ));
        }
        Ok(())
    }

    fn lookup(&self, table: &str) -> Result<&StaticTable, AppError> {
        self.check_metadata()?;
        self.tables
            .get(table)
            .ok_or_else(|| AppError::ConnectionFailure(format!("table {} not in catalog", table)))
    }

    /// Resolve the table a generated sample query reads from
    fn sampled_table(&self, sql: &str) -> Option<&str> {
        self.order.iter().map(String::as_str).find(|name| {
            sql.contains(&format!("\"{}\"", name)) || sql.contains(&format!("`{}`", name))
        })
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn product_name(&self) -> Result<String, AppError> {
        self.check_metadata()?;
        if self.fail_product {
            return Err(AppError::ConnectionFailure("connection refused".to_string()));
        }
        Ok(self.product.clone())
    }

    async fn list_tables(&self, _owner: &str) -> Result<CatalogRows<String>, AppError> {
        self.check_metadata()?;
        Ok(self.order.clone().into())
    }

    async fn list_columns(&self, table: &str) -> Result<CatalogRows<CatalogColumn>, AppError> {
        Ok(self.lookup(table)?.columns.clone().into())
    }

    async fn list_primary_keys(&self, table: &str) -> Result<CatalogRows<String>, AppError> {
        Ok(self.lookup(table)?.primary_keys.clone().into())
    }

    async fn list_imported_keys(&self, table: &str) -> Result<CatalogRows<ImportedKey>, AppError> {
        Ok(self.lookup(table)?.imported_keys.clone().into())
    }

    async fn execute_query(&self, sql: &str) -> Result<CatalogRows<SampleRow>, AppError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.executed.lock().unwrap().push(sql.to_string());

        let table = self.sampled_table(sql).ok_or_else(|| {
            AppError::ConnectionFailure(format!("unknown table in query: {}", sql))
        })?;

        if self.failing_samples.contains(table) {
            return Err(AppError::ConnectionFailure(format!(
                "simulated sampling failure on {}",
                table
            )));
        }

        Ok(self.tables[table].rows.clone().into())
    }
}
