//! Diagram rendering
//!
//! Turns a scanned schema into:
//! - Mermaid ER-diagram text for the whole schema
//! - A node/edge graph document
//! - Per-domain diagrams, chunked for large domains

pub mod chunks;
pub mod graph;
pub mod mermaid;

pub use chunks::DiagramChunk;
pub use graph::GraphDocument;

use crate::domains::DomainMapping;
use crate::error::AppError;
use crate::models::Schema;
use mermaid::ColumnFilter;

pub struct DiagramSerializer;

impl DiagramSerializer {
    /// Whole-schema diagram listing every column
    pub fn er_diagram(schema: &Schema) -> String {
        mermaid::render(&schema.tables, &schema.relationships, ColumnFilter::All)
    }

    pub fn graph(schema: &Schema) -> GraphDocument {
        graph::render(schema)
    }

    /// One diagram per domain chunk, in mapping order
    pub fn domain_chunks(
        schema: &Schema,
        mapping: &DomainMapping,
        chunk_size: usize,
    ) -> Result<Vec<DiagramChunk>, AppError> {
        chunks::render(schema, mapping, chunk_size)
    }
}
