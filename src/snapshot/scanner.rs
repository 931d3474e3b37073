//! Scan orchestration
//!
//! A scan validates its configuration, reads the catalog, runs inference and
//! publishes the resulting schema in one step. A failed scan publishes
//! nothing, leaving the previous schema (if any) in place.

use super::store::SchemaStore;
use crate::catalog::Catalog;
use crate::config::ScanConfig;
use crate::error::AppError;
use crate::inference::{Inference, InferenceEngine, SamplingPlan};
use crate::introspection::CatalogReader;
use crate::models::{RelationshipKind, Schema};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

/// Summary of a completed scan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub scanned_at: DateTime<Utc>,
    pub table_count: usize,
    pub strict_count: usize,
    pub name_inferred_count: usize,
    pub data_overlap_count: usize,
    pub sampled_tables: usize,
    pub failed_samples: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_skipped: Option<String>,
    pub checksum: String,
}

impl ScanReport {
    fn new(schema: &Schema, inference: &Inference) -> Self {
        Self {
            scanned_at: Utc::now(),
            table_count: schema.tables.len(),
            strict_count: schema.count_of(RelationshipKind::Strict),
            name_inferred_count: schema.count_of(RelationshipKind::NameInferred),
            data_overlap_count: schema.count_of(RelationshipKind::DataOverlapInferred),
            sampled_tables: inference.sampled_tables,
            failed_samples: inference.failed_samples.clone(),
            overlap_skipped: inference.overlap_skipped.clone(),
            checksum: schema.checksum(),
        }
    }
}

pub struct ScanService;

impl ScanService {
    /// Build a schema without publishing it
    pub async fn build(
        catalog: &dyn Catalog,
        config: &ScanConfig,
    ) -> Result<(Schema, Inference), AppError> {
        config.validate()?;

        let snapshot = CatalogReader::read(catalog, &config.owner, &config.target()).await?;

        let plan = config.samples_rows().then(|| SamplingPlan {
            owner: config.owner.clone(),
            tables: snapshot.table_names(),
            rows_per_table: config.sample_size,
        });

        let mut inference = InferenceEngine::infer(catalog, &snapshot, plan.as_ref()).await?;
        let relationships = std::mem::take(&mut inference.relationships);

        Ok((Schema::new(snapshot.tables, relationships), inference))
    }

    /// Scan and publish the result to `store`
    pub async fn run(
        catalog: &dyn Catalog,
        config: &ScanConfig,
        store: &SchemaStore,
    ) -> Result<ScanReport, AppError> {
        info!("Starting schema scan of {:?}", config.target());

        let (schema, inference) = Self::build(catalog, config).await.inspect_err(|e| {
            if e.is_connection_failure() {
                error!("Catalog unavailable, scan aborted without publishing: {}", e);
            }
        })?;
        let report = ScanReport::new(&schema, &inference);
        store.set(schema).await;

        info!(
            "Scan complete: {} tables, checksum {}",
            report.table_count, report.checksum
        );
        Ok(report)
    }
}
