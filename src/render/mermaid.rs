//! Mermaid `erDiagram` text
//!
//! The referenced table is always drawn on the "one" side
//! (`TARGET ||--o{ SOURCE`); cardinality is not verified against data.

use crate::models::{Column, Relationship, Table};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

const HEADER: &str = "erDiagram\n    direction TB\n\n";

/// Which columns a table block lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFilter {
    All,
    /// Key columns and relationship endpoints only
    KeysAndEndpoints,
}

/// Diagram of the given tables and relationships
pub fn render(tables: &[Table], relationships: &[Relationship], filter: ColumnFilter) -> String {
    let mut endpoints: HashMap<&str, HashSet<&str>> = HashMap::new();
    if filter == ColumnFilter::KeysAndEndpoints {
        for rel in relationships {
            endpoints
                .entry(rel.source_table.as_str())
                .or_default()
                .insert(rel.source_column.as_str());
            endpoints
                .entry(rel.target_table.as_str())
                .or_default()
                .insert(rel.target_column.as_str());
        }
    }

    let mut out = String::from(HEADER);

    for table in tables {
        let _ = writeln!(out, "    {} {{", entity_name(&table.name));

        let table_endpoints = endpoints.get(table.name.as_str());
        for column in &table.columns {
            let listed = match filter {
                ColumnFilter::All => true,
                ColumnFilter::KeysAndEndpoints => {
                    column.is_primary_key
                        || column.is_foreign_key
                        || table_endpoints.is_some_and(|cols| cols.contains(column.name.as_str()))
                }
            };
            if listed {
                write_attribute(&mut out, column);
            }
        }

        out.push_str("    }\n\n");
    }

    for rel in relationships {
        let _ = writeln!(
            out,
            "    {} ||--o{{ {} : {}",
            entity_name(&rel.target_table),
            entity_name(&rel.source_table),
            mermaid_word(&rel.source_column)
        );
    }

    out
}

fn write_attribute(out: &mut String, column: &Column) {
    let _ = write!(
        out,
        "        {} {}",
        attribute_type(&column.data_type),
        mermaid_word(&column.name)
    );
    if column.is_primary_key {
        out.push_str(" PK");
    } else if column.is_foreign_key {
        out.push_str(" FK");
    }
    out.push('\n');
}

/// Name with every character outside `[A-Za-z0-9_]` replaced by `_`
fn mermaid_word(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn entity_name(table: &str) -> String {
    mermaid_word(table).to_uppercase()
}

/// Declared type as a single Mermaid word, e.g. `character varying` -> `character_varying`
fn attribute_type(data_type: &str) -> String {
    let word = mermaid_word(data_type);
    let word = word.trim_matches('_');
    if word.is_empty() {
        "string".to_string()
    } else {
        word.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tables() -> Vec<Table> {
        let mut id = Column::new("id", "integer");
        id.is_primary_key = true;
        let mut customer_id = Column::new("customer_id", "integer");
        customer_id.is_foreign_key = true;
        let mut cid = Column::new("id", "integer");
        cid.is_primary_key = true;

        vec![
            Table::new(
                "orders",
                vec![id, customer_id, Column::new("note", "character varying(255)")],
            ),
            Table::new("customers", vec![cid, Column::new("email", "")]),
        ]
    }

    #[test]
    fn test_full_diagram() {
        let rels = vec![Relationship::strict("orders", "customer_id", "customers", "id")];
        let text = render(&tables(), &rels, ColumnFilter::All);

        assert_eq!(
            text,
            "erDiagram\n    direction TB\n\n\
             \x20   ORDERS {\n\
             \x20       integer id PK\n\
             \x20       integer customer_id FK\n\
             \x20       character_varying_255 note\n\
             \x20   }\n\n\
             \x20   CUSTOMERS {\n\
             \x20       integer id PK\n\
             \x20       string email\n\
             \x20   }\n\n\
             \x20   CUSTOMERS ||--o{ ORDERS : customer_id\n"
        );
    }

    #[test]
    fn test_filtered_diagram_keeps_keys_and_endpoints() {
        let mut tables = tables();
        tables[1].columns.push(Column::new("ref_code", "text"));
        let rels = vec![Relationship::data_overlap("orders", "note", "customers", "ref_code", 0.8)];

        let text = render(&tables, &rels, ColumnFilter::KeysAndEndpoints);

        assert!(text.contains("character_varying_255 note\n"));
        assert!(text.contains("text ref_code\n"));
        assert!(!text.contains("email"));
        assert!(text.ends_with("    CUSTOMERS ||--o{ ORDERS : note\n"));
    }

    #[test]
    fn test_names_are_reduced_to_mermaid_words() {
        let mut key = Column::new("order id", "integer");
        key.is_primary_key = true;
        let tables = vec![
            Table::new("order-lines", vec![key, Column::new("sku-code", "text")]),
            Table::new("sku list", vec![Column::new("sku-code", "text")]),
        ];
        let rels = vec![Relationship::data_overlap(
            "order-lines",
            "sku-code",
            "sku list",
            "sku-code",
            0.9,
        )];

        let text = render(&tables, &rels, ColumnFilter::All);

        assert!(text.contains("    ORDER_LINES {\n"));
        assert!(text.contains("        integer order_id PK\n"));
        assert!(text.contains("        text sku_code\n"));
        assert!(text.contains("    SKU_LIST {\n"));
        assert!(text.ends_with("    SKU_LIST ||--o{ ORDER_LINES : sku_code\n"));
    }
}
