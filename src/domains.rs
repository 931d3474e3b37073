//! Domain mapping
//!
//! External grouping of tables into named domains, read at render time from a
//! JSON object of the form `{ "Domain name": ["table", ...], ... }`.
//! Domain order follows the document.

use crate::error::AppError;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainMapping {
    pub domains: Vec<Domain>,
}

impl DomainMapping {
    /// Parse the mapping document
    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| AppError::DomainMappingMissing(format!("invalid domain mapping: {}", e)))?;

        let Value::Object(map) = value else {
            return Err(AppError::DomainMappingMissing(
                "domain mapping must be a JSON object".to_string(),
            ));
        };

        let mut domains = Vec::with_capacity(map.len());
        for (name, tables) in map {
            let tables: Vec<String> = serde_json::from_value(tables).map_err(|e| {
                AppError::DomainMappingMissing(format!("domain {}: {}", name, e))
            })?;
            domains.push(Domain { name, tables });
        }

        Ok(Self { domains })
    }

    /// Read the mapping file; a missing or unreadable file is `DomainMappingMissing`
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::DomainMappingMissing(format!("{}: {}", path.display(), e))
        })?;

        let mapping = Self::from_json(&text)?;
        debug!("Loaded {} domains from {}", mapping.domains.len(), path.display());
        Ok(mapping)
    }
}
