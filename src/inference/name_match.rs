//! Relationships inferred from column names matching a primary key elsewhere
//!
//! Each non-key column is looked up in the primary-key index instead of being
//! compared against every other table, so the pass stays linear in the number
//! of columns.

use crate::introspection::PrimaryKeyIndex;
use crate::models::{Relationship, Table};

pub fn infer(tables: &[Table], index: &PrimaryKeyIndex) -> Vec<Relationship> {
    let mut relationships = Vec::new();
    if index.is_empty() {
        return relationships;
    }

    for table in tables {
        for column in table.columns.iter().filter(|c| !c.is_primary_key) {
            for owner in index.lookup(&column.name) {
                if owner.table == table.name {
                    continue;
                }
                relationships.push(Relationship::name_inferred(
                    &table.name,
                    &column.name,
                    &owner.table,
                    &owner.column,
                ));
            }
        }
    }

    relationships
}
