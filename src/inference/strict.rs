//! Relationships declared by catalog foreign keys

use crate::introspection::DeclaredForeignKey;
use crate::models::Relationship;

/// One strict relationship per declared foreign key column
pub fn infer(foreign_keys: &[DeclaredForeignKey]) -> Vec<Relationship> {
    foreign_keys
        .iter()
        .map(|fk| Relationship::strict(&fk.table, &fk.column, &fk.ref_table, &fk.ref_column))
        .collect()
}
