//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::catalog::Catalog;
use crate::config::ScanConfig;
use crate::snapshot::SchemaStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across all handlers
pub struct AppState {
    /// Catalog of the scanned database
    pub catalog: Arc<dyn Catalog>,

    /// Schema published by the last successful scan
    pub schemas: SchemaStore,

    pub scan: ScanConfig,

    /// Held for the duration of a scan; keeps the store single-writer
    pub scan_lock: Mutex<()>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>, scan: ScanConfig) -> Self {
        Self {
            catalog,
            schemas: SchemaStore::new(),
            scan,
            scan_lock: Mutex::new(()),
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
