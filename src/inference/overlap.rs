//! Relationships inferred from overlapping sampled values
//!
//! Each allow-listed table is sampled once; every column pair across two
//! sampled tables is then scored by `|A ∩ B| / min(|A|, |B|)` over the sets of
//! distinct non-null values.

use super::SamplingPlan;
use crate::catalog::Catalog;
use crate::dialect::Dialect;
use crate::error::AppError;
use crate::models::{Relationship, OVERLAP_THRESHOLD};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Distinct non-null values seen per column, in result column order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSample {
    pub table: String,
    pub columns: Vec<(String, HashSet<String>)>,
}

impl TableSample {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    /// Record one value; `None` only registers the column
    pub fn record(&mut self, column: &str, value: Option<String>) {
        let idx = match self.columns.iter().position(|(name, _)| name == column) {
            Some(idx) => idx,
            None => {
                self.columns.push((column.to_string(), HashSet::new()));
                self.columns.len() - 1
            }
        };
        if let Some(value) = value {
            self.columns[idx].1.insert(value);
        }
    }
}

/// Overlap ratio of two value sets; `None` when either set is empty
pub fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> Option<f64> {
    let denominator = a.len().min(b.len());
    if denominator == 0 {
        return None;
    }
    let shared = a.intersection(b).count();
    Some(shared as f64 / denominator as f64)
}

/// Run one bounded sample query for `owner.table`
pub async fn sample_table(
    catalog: &dyn Catalog,
    dialect: Dialect,
    owner: &str,
    table: &str,
    rows: usize,
) -> Result<TableSample, AppError> {
    let sql = dialect.sample_query(owner, table, rows);
    debug!("Sampling {} with: {}", table, sql);

    let mut sample = TableSample::new(table);
    for row in catalog.execute_query(&sql).await? {
        for (column, value) in row {
            sample.record(&column, value);
        }
    }
    Ok(sample)
}

/// Score every column pair of every unordered table pair
pub fn infer_from_samples(samples: &[TableSample]) -> Vec<Relationship> {
    let mut relationships = Vec::new();

    for (i, left) in samples.iter().enumerate() {
        for right in &samples[i + 1..] {
            for (left_col, left_values) in &left.columns {
                for (right_col, right_values) in &right.columns {
                    let Some(ratio) = overlap(left_values, right_values) else {
                        continue;
                    };
                    if ratio >= OVERLAP_THRESHOLD {
                        relationships.push(Relationship::data_overlap(
                            &left.table,
                            left_col,
                            &right.table,
                            right_col,
                            ratio,
                        ));
                    }
                }
            }
        }
    }

    relationships
}

/// Outcome of the sampling pass
#[derive(Debug, Clone, Default)]
pub struct OverlapOutcome {
    pub relationships: Vec<Relationship>,
    pub sampled_tables: usize,
    /// Tables whose sample query failed; they take part in no pair
    pub failed_tables: Vec<String>,
}

/// Sample the planned tables and infer overlap relationships.
///
/// Per-table sampling errors are logged and the table is left out; the pass
/// always completes.
pub async fn infer(catalog: &dyn Catalog, dialect: Dialect, plan: &SamplingPlan) -> OverlapOutcome {
    let mut samples = Vec::with_capacity(plan.tables.len());
    let mut failed_tables = Vec::new();

    for table in &plan.tables {
        match sample_table(catalog, dialect, &plan.owner, table, plan.rows_per_table).await {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                warn!("Sampling {} failed, treating its overlaps as zero: {}", table, e);
                failed_tables.push(table.clone());
            }
        }
    }

    OverlapOutcome {
        relationships: infer_from_samples(&samples),
        sampled_tables: samples.len(),
        failed_tables,
    }
}
