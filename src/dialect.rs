//! SQL dialects for bounded row sampling
//!
//! Sampling syntax differs between engines, so the dialect is always resolved
//! from the catalog's product name and never defaulted.

use crate::error::AppError;

/// Supported database engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Row-number bounded: `WHERE ROWNUM <= n`
    Oracle,
    /// `LIMIT n`, backtick-quoted identifiers
    MySql,
    /// `LIMIT n`, double-quoted identifiers
    Postgres,
}

impl Dialect {
    /// Resolve the dialect from a database product name
    pub fn from_product_name(product: &str) -> Result<Self, AppError> {
        let lower = product.to_lowercase();

        if lower.contains("oracle") {
            Ok(Dialect::Oracle)
        } else if lower.contains("mysql") || lower.contains("mariadb") {
            Ok(Dialect::MySql)
        } else if lower.contains("postgres") {
            Ok(Dialect::Postgres)
        } else {
            Err(AppError::UnsupportedDialect(product.to_string()))
        }
    }

    /// Build a query returning at most `rows` rows of `owner.table`
    pub fn sample_query(&self, owner: &str, table: &str, rows: usize) -> String {
        let table = format!(
            "{}.{}",
            self.quote_identifier(owner),
            self.quote_identifier(table)
        );
        match self {
            Dialect::Oracle => format!("SELECT * FROM {} WHERE ROWNUM <= {}", table, rows),
            Dialect::MySql | Dialect::Postgres => {
                format!("SELECT * FROM {} LIMIT {}", table, rows)
            }
        }
    }

    fn quote_identifier(&self, ident: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
            Dialect::Oracle | Dialect::Postgres => format!("\"{}\"", ident.replace('"', "\"\"")),
        }
    }
}
