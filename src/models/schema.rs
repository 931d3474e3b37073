//! Scanned schema model
//!
//! Tables, columns and relationship edges produced by a single scan.
//! A `Schema` is built once and never mutated afterwards; the store hands it
//! out behind an `Arc`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Confidence of a relationship declared by a catalog foreign key
pub const STRICT_CONFIDENCE: f64 = 1.0;

/// Confidence of a relationship inferred from a column-name match
pub const NAME_MATCH_CONFIDENCE: f64 = 0.6;

/// Minimum value overlap for a sampled relationship to be emitted
pub const OVERLAP_THRESHOLD: f64 = 0.6;

/// Column of a scanned table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_primary_key: false,
            is_foreign_key: false,
        }
    }
}

/// Table representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Primary key column names, in column order
    pub fn primary_keys(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_primary_key)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Case-insensitive column lookup
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// How a relationship was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Declared foreign key constraint
    Strict,
    /// Column name matches another table's primary key
    NameInferred,
    /// Sampled values overlap between two columns
    DataOverlapInferred,
}

/// Directed edge from a referencing column to a referenced column.
///
/// Only names are stored; a relationship does not own the tables it links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub kind: RelationshipKind,
    pub confidence: f64,
}

impl Relationship {
    pub fn strict(
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
            kind: RelationshipKind::Strict,
            confidence: STRICT_CONFIDENCE,
        }
    }

    pub fn name_inferred(
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
            kind: RelationshipKind::NameInferred,
            confidence: NAME_MATCH_CONFIDENCE,
        }
    }

    /// Overlap-based edge; `overlap` is clamped into `[0, 1]`
    pub fn data_overlap(
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
        overlap: f64,
    ) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
            kind: RelationshipKind::DataOverlapInferred,
            confidence: overlap.clamp(0.0, 1.0),
        }
    }
}

/// Complete result of one scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
}

impl Schema {
    pub fn new(tables: Vec<Table>, relationships: Vec<Relationship>) -> Self {
        Self {
            tables,
            relationships,
        }
    }

    pub fn count_of(&self, kind: RelationshipKind) -> usize {
        self.relationships.iter().filter(|r| r.kind == kind).count()
    }

    /// Compute checksum from schema content
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();

        for table in &self.tables {
            hasher.update(format!("T:{}", table.name).as_bytes());
            for col in &table.columns {
                hasher.update(
                    format!(
                        "C:{}.{}:{}:{}:{}",
                        table.name, col.name, col.data_type, col.is_primary_key, col.is_foreign_key
                    )
                    .as_bytes(),
                );
            }
        }

        for rel in &self.relationships {
            hasher.update(
                format!(
                    "R:{:?}:{}.{}->{}.{}:{}",
                    rel.kind,
                    rel.source_table,
                    rel.source_column,
                    rel.target_table,
                    rel.target_column,
                    rel.confidence
                )
                .as_bytes(),
            );
        }

        format!("{:x}", hasher.finalize())
    }
}
