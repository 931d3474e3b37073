//! Schema Introspection Module
//!
//! Reads tables, columns, primary keys and declared foreign keys from a
//! catalog, and builds the primary-key reverse index used by name matching.
//! Any catalog failure aborts the read; there is no partial snapshot.

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::models::{Column, Table};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Which tables a scan covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    /// Every base table the catalog lists for the owner
    All,
    /// Configured allow-list, in configuration order
    Only(Vec<String>),
}

/// Foreign key constraint as declared in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredForeignKey {
    pub table: String,
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

/// A table whose primary key contains a given column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryKeyOwner {
    pub table: String,
    pub column: String,
}

/// Lower-cased column name -> tables whose primary key uses that name.
///
/// Owners are kept in table order so lookups are deterministic.
#[derive(Debug, Clone, Default)]
pub struct PrimaryKeyIndex {
    entries: HashMap<String, Vec<PrimaryKeyOwner>>,
}

impl PrimaryKeyIndex {
    /// Single pass over every column of every table
    pub fn build(tables: &[Table]) -> Self {
        let mut entries: HashMap<String, Vec<PrimaryKeyOwner>> = HashMap::new();

        for table in tables {
            for column in table.columns.iter().filter(|c| c.is_primary_key) {
                entries
                    .entry(column.name.to_lowercase())
                    .or_default()
                    .push(PrimaryKeyOwner {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
            }
        }

        Self { entries }
    }

    pub fn lookup(&self, column: &str) -> &[PrimaryKeyOwner] {
        self.entries
            .get(&column.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct primary-key column names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything one catalog read produced
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub tables: Vec<Table>,
    pub foreign_keys: Vec<DeclaredForeignKey>,
    pub pk_index: PrimaryKeyIndex,
}

impl CatalogSnapshot {
    pub fn table_names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }
}

/// Reads table metadata from a catalog
pub struct CatalogReader;

impl CatalogReader {
    /// Read the target tables of `owner` from the catalog
    pub async fn read(
        catalog: &dyn Catalog,
        owner: &str,
        target: &ScanTarget,
    ) -> Result<CatalogSnapshot, AppError> {
        let listed: Vec<String> = catalog.list_tables(owner).await?.collect();
        let names = Self::resolve_target(listed, target);

        let mut tables = Vec::with_capacity(names.len());
        let mut foreign_keys = Vec::new();

        for name in names {
            let columns: Vec<Column> = catalog
                .list_columns(&name)
                .await?
                .map(|c| Column::new(c.name, c.data_type))
                .collect();
            let mut table = Table::new(name, columns);

            for pk in catalog.list_primary_keys(&table.name).await? {
                if let Some(column) = table.column_mut(&pk) {
                    column.is_primary_key = true;
                }
            }

            for key in catalog.list_imported_keys(&table.name).await? {
                if let Some(column) = table.column_mut(&key.fk_column) {
                    column.is_foreign_key = true;
                }
                foreign_keys.push(DeclaredForeignKey {
                    table: table.name.clone(),
                    column: key.fk_column,
                    ref_table: key.ref_table,
                    ref_column: key.ref_column,
                });
            }

            debug!(
                "Read table {}: {} columns, primary key {:?}",
                table.name,
                table.columns.len(),
                table.primary_keys()
            );

            tables.push(table);
        }

        let pk_index = PrimaryKeyIndex::build(&tables);

        info!(
            "Introspected {} tables, {} declared foreign keys, {} primary-key names",
            tables.len(),
            foreign_keys.len(),
            pk_index.len()
        );

        Ok(CatalogSnapshot {
            tables,
            foreign_keys,
            pk_index,
        })
    }

    /// Map the target onto catalog names, keeping target order and catalog casing
    fn resolve_target(listed: Vec<String>, target: &ScanTarget) -> Vec<String> {
        match target {
            ScanTarget::All => {
                let mut seen = HashSet::new();
                listed.into_iter().filter(|n| seen.insert(n.clone())).collect()
            }
            ScanTarget::Only(wanted) => {
                let by_lower: HashMap<String, &String> =
                    listed.iter().map(|n| (n.to_lowercase(), n)).collect();

                let mut seen = HashSet::new();
                let mut names = Vec::new();
                for want in wanted {
                    match by_lower.get(&want.to_lowercase()) {
                        Some(name) => {
                            if seen.insert((*name).clone()) {
                                names.push((*name).clone());
                            }
                        }
                        None => warn!("Configured table {} not found in catalog, skipping", want),
                    }
                }
                names
            }
        }
    }
}
