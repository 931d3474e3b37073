//! Schema Snapshot Module
//!
//! Scan orchestration and the store holding the current schema:
//! - Scan service (validate configuration, read catalog, infer, publish)
//! - Single-slot schema store

pub mod scanner;
pub mod store;

pub use scanner::{ScanReport, ScanService};
pub use store::SchemaStore;
