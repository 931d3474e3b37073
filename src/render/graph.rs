//! Node/edge graph document (Cytoscape element format)

use crate::models::{RelationshipKind, Schema};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct GraphDocument {
    pub nodes: Vec<Element<NodeData>>,
    pub edges: Vec<Element<EdgeData>>,
}

/// Wrapper expected by the browser-side renderer
#[derive(Debug, Clone, Serialize)]
pub struct Element<T> {
    pub data: T,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub id: String,
    pub label: String,
    pub columns: Vec<String>,
    pub primary_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    pub column: String,
    pub kind: RelationshipKind,
    pub confidence: f64,
}

pub fn render(schema: &Schema) -> GraphDocument {
    let nodes = schema
        .tables
        .iter()
        .map(|table| Element {
            data: NodeData {
                id: table.name.clone(),
                label: table.name.clone(),
                columns: table.columns.iter().map(|c| c.name.clone()).collect(),
                primary_keys: table.primary_keys().into_iter().map(String::from).collect(),
            },
        })
        .collect();

    let edges = schema
        .relationships
        .iter()
        .map(|rel| Element {
            data: EdgeData {
                id: format!("{}_{}_{}", rel.source_table, rel.target_table, rel.source_column),
                source: rel.source_table.clone(),
                target: rel.target_table.clone(),
                column: rel.source_column.clone(),
                kind: rel.kind,
                confidence: rel.confidence,
            },
        })
        .collect();

    GraphDocument { nodes, edges }
}
