//! Relationship Inference Module
//!
//! Combines three independent passes over a catalog snapshot:
//! - Strict: declared foreign keys (confidence 1.0)
//! - Name match: non-key columns named like another table's primary key (0.6)
//! - Data overlap: value overlap across sampled rows of allow-listed tables
//!
//! Results are concatenated in that order. The same column pair may appear
//! under more than one kind; no cross-kind deduplication is applied.

pub mod name_match;
pub mod overlap;
pub mod strict;

use crate::catalog::Catalog;
use crate::dialect::Dialect;
use crate::error::AppError;
use crate::introspection::CatalogSnapshot;
use crate::models::Relationship;
use tracing::{info, warn};

/// Tables to sample for the overlap pass, and how many rows each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingPlan {
    /// Schema the sampled tables live in
    pub owner: String,
    pub tables: Vec<String>,
    pub rows_per_table: usize,
}

/// Relationships found by one inference run
#[derive(Debug, Clone, Default)]
pub struct Inference {
    pub relationships: Vec<Relationship>,
    pub sampled_tables: usize,
    pub failed_samples: Vec<String>,
    /// Why the overlap pass did not run, if it was planned but skipped
    pub overlap_skipped: Option<String>,
}

pub struct InferenceEngine;

impl InferenceEngine {
    /// Run all passes; only the overlap pass touches the catalog.
    ///
    /// An unsupported dialect skips the overlap pass. Any other catalog error
    /// fails the whole run.
    pub async fn infer(
        catalog: &dyn Catalog,
        snapshot: &CatalogSnapshot,
        sampling: Option<&SamplingPlan>,
    ) -> Result<Inference, AppError> {
        let mut relationships = strict::infer(&snapshot.foreign_keys);
        let strict_count = relationships.len();

        relationships.extend(name_match::infer(&snapshot.tables, &snapshot.pk_index));
        let name_count = relationships.len() - strict_count;

        let mut inference = Inference::default();

        if let Some(plan) = sampling {
            let product = catalog.product_name().await?;
            match Dialect::from_product_name(&product) {
                Ok(dialect) => {
                    let outcome = overlap::infer(catalog, dialect, plan).await;
                    inference.sampled_tables = outcome.sampled_tables;
                    inference.failed_samples = outcome.failed_tables;
                    relationships.extend(outcome.relationships);
                }
                Err(e @ AppError::UnsupportedDialect(_)) => {
                    warn!("Skipping data overlap inference: {}", e);
                    inference.overlap_skipped = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Inferred {} strict, {} name-matched, {} data-overlap relationships",
            strict_count,
            name_count,
            relationships.len() - strict_count - name_count
        );

        inference.relationships = relationships;
        Ok(inference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::memory::StaticCatalog;
    use crate::introspection::{CatalogReader, ScanTarget};
    use crate::models::RelationshipKind;
    use pretty_assertions::assert_eq;

    async fn run(catalog: &StaticCatalog, sampling: Option<&SamplingPlan>) -> Inference {
        let snapshot = CatalogReader::read(catalog, "public", &ScanTarget::All)
            .await
            .unwrap();
        InferenceEngine::infer(catalog, &snapshot, sampling)
            .await
            .unwrap()
    }

    fn plan(tables: &[&str]) -> SamplingPlan {
        SamplingPlan {
            owner: "public".to_string(),
            tables: tables.iter().map(|t| t.to_string()).collect(),
            rows_per_table: 10,
        }
    }

    #[tokio::test]
    async fn test_declared_key_without_name_match() {
        let catalog = StaticCatalog::new("PostgreSQL")
            .table("orders", &[("id", "integer"), ("customer_id", "integer")], &["id"])
            .table("customers", &[("id", "integer")], &["id"])
            .foreign_key("orders", "customer_id", "customers", "id");

        let inference = run(&catalog, None).await;

        assert_eq!(
            inference.relationships,
            vec![Relationship::strict("orders", "customer_id", "customers", "id")]
        );
    }

    #[tokio::test]
    async fn test_name_match_without_declared_key() {
        let catalog = StaticCatalog::new("PostgreSQL")
            .table("orders", &[("id", "integer"), ("customer_id", "integer")], &["id"])
            .table("customer", &[("customer_id", "integer")], &["customer_id"]);

        let inference = run(&catalog, None).await;

        assert_eq!(
            inference.relationships,
            vec![Relationship::name_inferred(
                "orders",
                "customer_id",
                "customer",
                "customer_id"
            )]
        );
    }

    #[tokio::test]
    async fn test_kinds_are_ordered_and_not_deduplicated() {
        let catalog = StaticCatalog::new("MySQL")
            .table("orders", &[("id", "int"), ("customer_id", "int")], &["id"])
            .table("customer", &[("customer_id", "int")], &["customer_id"])
            .foreign_key("orders", "customer_id", "customer", "customer_id")
            .row("orders", &[("id", Some("1")), ("customer_id", Some("7"))])
            .row("orders", &[("id", Some("2")), ("customer_id", Some("8"))])
            .row("customer", &[("customer_id", Some("7"))])
            .row("customer", &[("customer_id", Some("8"))]);

        let sampling = plan(&["orders", "customer"]);
        let inference = run(&catalog, Some(&sampling)).await;

        let kinds: Vec<_> = inference.relationships.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RelationshipKind::Strict,
                RelationshipKind::NameInferred,
                RelationshipKind::DataOverlapInferred,
            ]
        );
        assert_eq!(inference.sampled_tables, 2);
    }

    #[tokio::test]
    async fn test_unsupported_dialect_skips_only_overlap() {
        let catalog = StaticCatalog::new("SQLite")
            .table("orders", &[("id", "integer"), ("customer_id", "integer")], &["id"])
            .table("customer", &[("customer_id", "integer")], &["customer_id"]);

        let sampling = plan(&["orders", "customer"]);
        let inference = run(&catalog, Some(&sampling)).await;

        assert_eq!(inference.relationships.len(), 1);
        assert_eq!(catalog.query_count(), 0);
        assert!(inference
            .overlap_skipped
            .as_deref()
            .unwrap()
            .contains("SQLite"));
    }

    #[tokio::test]
    async fn test_confidence_by_kind() {
        let catalog = StaticCatalog::new("Oracle")
            .table("A", &[("UID", "NUMBER")], &[])
            .table("B", &[("ID", "NUMBER")], &["ID"])
            .table("C", &[("ID", "NUMBER"), ("B_ID", "NUMBER")], &["ID"])
            .foreign_key("C", "B_ID", "B", "ID")
            .row("A", &[("UID", Some("1"))])
            .row("A", &[("UID", Some("2"))])
            .row("A", &[("UID", Some("3"))])
            .row("B", &[("ID", Some("2"))])
            .row("B", &[("ID", Some("3"))])
            .row("B", &[("ID", Some("4"))])
            .row("B", &[("ID", Some("5"))]);

        let sampling = plan(&["A", "B"]);
        let inference = run(&catalog, Some(&sampling)).await;

        assert!(!inference.relationships.is_empty());
        for rel in &inference.relationships {
            match rel.kind {
                RelationshipKind::Strict => assert_eq!(rel.confidence, 1.0),
                RelationshipKind::NameInferred => assert_eq!(rel.confidence, 0.6),
                RelationshipKind::DataOverlapInferred => {
                    assert!((0.6..=1.0).contains(&rel.confidence))
                }
            }
        }
    }

    #[tokio::test]
    async fn test_product_lookup_failure_is_fatal() {
        let catalog = StaticCatalog::new("PostgreSQL")
            .table("orders", &[("id", "integer"), ("customer_id", "integer")], &["id"])
            .table("customer", &[("customer_id", "integer")], &["customer_id"]);
        let snapshot = CatalogReader::read(&catalog, "public", &ScanTarget::All)
            .await
            .unwrap();

        let failing = catalog.with_product_failure();
        let sampling = plan(&["orders", "customer"]);
        let result = InferenceEngine::infer(&failing, &snapshot, Some(&sampling)).await;

        assert!(result.unwrap_err().is_connection_failure());
        assert_eq!(failing.query_count(), 0);
    }

    #[tokio::test]
    async fn test_product_name_not_needed_without_sampling() {
        let catalog = StaticCatalog::new("PostgreSQL")
            .table("orders", &[("id", "integer"), ("customer_id", "integer")], &["id"])
            .table("customer", &[("customer_id", "integer")], &["customer_id"]);
        let snapshot = CatalogReader::read(&catalog, "public", &ScanTarget::All)
            .await
            .unwrap();

        let failing = catalog.with_product_failure();
        let inference = InferenceEngine::infer(&failing, &snapshot, None).await.unwrap();

        assert_eq!(inference.relationships.len(), 1);
    }
}
