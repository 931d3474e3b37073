//! Domain-chunked diagrams
//!
//! Each domain's tables are split into fixed-size, order-preserving chunks and
//! every chunk is drawn as a self-contained diagram. Relationships crossing a
//! chunk boundary are dropped from both sides.

use super::mermaid::{self, ColumnFilter};
use crate::domains::DomainMapping;
use crate::error::{configuration_error, AppError};
use crate::models::{Relationship, Schema, Table};
use serde::Serialize;
use std::collections::HashSet;

/// One rendered chunk
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramChunk {
    /// Domain name, or `"<domain> - Part <n>"` when the domain was split
    pub key: String,
    pub tables: Vec<String>,
    pub diagram: String,
}

pub fn render(
    schema: &Schema,
    mapping: &DomainMapping,
    chunk_size: usize,
) -> Result<Vec<DiagramChunk>, AppError> {
    if chunk_size == 0 {
        return Err(configuration_error("chunk size must be at least 1"));
    }

    let mut result = Vec::new();

    for domain in &mapping.domains {
        let members: HashSet<&str> = domain.tables.iter().map(String::as_str).collect();
        let domain_tables: Vec<&Table> = schema
            .tables
            .iter()
            .filter(|t| members.contains(t.name.as_str()))
            .collect();

        let split = domain_tables.len() > chunk_size;

        for (i, chunk) in domain_tables.chunks(chunk_size).enumerate() {
            let names: HashSet<&str> = chunk.iter().map(|t| t.name.as_str()).collect();
            let relationships: Vec<Relationship> = schema
                .relationships
                .iter()
                .filter(|r| {
                    names.contains(r.source_table.as_str())
                        && names.contains(r.target_table.as_str())
                })
                .cloned()
                .collect();

            let tables: Vec<Table> = chunk.iter().map(|t| (*t).clone()).collect();
            if is_degenerate(&tables, &relationships) {
                continue;
            }

            let key = if split {
                format!("{} - Part {}", domain.name, i + 1)
            } else {
                domain.name.clone()
            };

            result.push(DiagramChunk {
                key,
                tables: tables.iter().map(|t| t.name.clone()).collect(),
                diagram: mermaid::render(&tables, &relationships, ColumnFilter::KeysAndEndpoints),
            });
        }
    }

    Ok(result)
}

/// Nothing to draw but empty table boxes
fn is_degenerate(tables: &[Table], relationships: &[Relationship]) -> bool {
    relationships.is_empty()
        && tables
            .iter()
            .all(|t| t.columns.iter().all(|c| !c.is_primary_key && !c.is_foreign_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::Domain;
    use crate::models::Column;
    use pretty_assertions::assert_eq;

    fn keyed(name: &str) -> Table {
        let mut id = Column::new("id", "integer");
        id.is_primary_key = true;
        Table::new(name, vec![id, Column::new("ref_id", "integer")])
    }

    fn schema(count: usize) -> Schema {
        let tables: Vec<Table> = (1..=count).map(|i| keyed(&format!("t{}", i))).collect();
        // t1 -> t2 stays inside a chunk of 2, t2 -> t3 crosses the boundary
        let relationships = vec![
            Relationship::name_inferred("t1", "ref_id", "t2", "id"),
            Relationship::name_inferred("t2", "ref_id", "t3", "id"),
        ];
        Schema::new(tables, relationships)
    }

    fn mapping(domains: &[(&str, &[&str])]) -> DomainMapping {
        DomainMapping {
            domains: domains
                .iter()
                .map(|(name, tables)| Domain {
                    name: name.to_string(),
                    tables: tables.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_unsplit_domain_uses_plain_key() {
        let chunks = render(&schema(3), &mapping(&[("Core", &["t3", "t1"])]), 20).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].key, "Core");
        // schema order, not mapping order
        assert_eq!(chunks[0].tables, vec!["t1", "t3"]);
    }

    #[test]
    fn test_split_domain_partitions_in_order() {
        let domain = ["t1", "t2", "t3", "t4", "t5"];
        let chunks = render(&schema(5), &mapping(&[("Core", &domain)]), 2).unwrap();

        let keys: Vec<_> = chunks.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["Core - Part 1", "Core - Part 2", "Core - Part 3"]);

        let flattened: Vec<String> = chunks.iter().flat_map(|c| c.tables.clone()).collect();
        assert_eq!(flattened, domain.to_vec());
    }

    #[test]
    fn test_cross_chunk_edges_are_dropped() {
        let domain = ["t1", "t2", "t3", "t4"];
        let chunks = render(&schema(4), &mapping(&[("Core", &domain)]), 2).unwrap();

        assert!(chunks[0].diagram.contains("T2 ||--o{ T1 : ref_id"));
        assert!(!chunks[0].diagram.contains("T3 ||--o{ T2"));
        assert!(!chunks[1].diagram.contains("||--o{"));
        // ref_id is only an endpoint in the first chunk
        assert!(chunks[0].diagram.contains("integer ref_id\n"));
        assert!(!chunks[1].diagram.contains("ref_id"));
    }

    #[test]
    fn test_empty_and_keyless_domains_are_omitted() {
        let mut s = schema(2);
        s.tables.push(Table::new("log", vec![Column::new("line", "text")]));

        let chunks = render(
            &s,
            &mapping(&[("Ghost", &["missing"]), ("Logs", &["log"]), ("Core", &["t1"])]),
            20,
        )
        .unwrap();

        let keys: Vec<_> = chunks.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["Core"]);
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let result = render(&schema(1), &mapping(&[("Core", &["t1"])]), 0);
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
