//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::error::{configuration_error, AppError};
use crate::introspection::ScanTarget;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use thiserror::Error;

/// Plain SQL identifier, as accepted in the table allow-list
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_$]*$").expect("valid identifier regex"));

/// Allow-list value selecting every catalog table
const ALL_TABLES: &str = "*";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_pool_size: usize,
    pub use_tls: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            max_pool_size: 10,
            use_tls: false,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Scan and rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    pub enabled: bool,
    /// Schema whose tables are scanned
    pub owner: String,
    /// Table allow-list; `["*"]` selects every catalog table
    pub tables: Vec<String>,
    pub max_tables: usize,
    pub sampling_enabled: bool,
    pub sample_size: usize,
    /// Default tables per diagram for domain-chunked rendering
    pub chunk_size: usize,
    pub domains_file: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            owner: "public".to_string(),
            tables: Vec::new(),
            max_tables: 50,
            sampling_enabled: true,
            sample_size: 10,
            chunk_size: 20,
            domains_file: PathBuf::from("output/domains.json"),
        }
    }
}

impl ScanConfig {
    /// Check the configuration before any catalog access
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.enabled {
            return Err(configuration_error("Relationship scanning disabled in config"));
        }
        if self.tables.is_empty() {
            return Err(configuration_error("No tables configured for scanning"));
        }
        if self.sample_size == 0 {
            return Err(configuration_error("SAMPLE_SIZE must be at least 1"));
        }
        if self.chunk_size == 0 {
            return Err(configuration_error("CHUNK_SIZE must be at least 1"));
        }
        if self.scans_all_tables() {
            return Ok(());
        }
        if self.tables.len() > self.max_tables {
            return Err(configuration_error(format!(
                "Too many tables configured: {} (max {})",
                self.tables.len(),
                self.max_tables
            )));
        }
        if let Some(bad) = self.tables.iter().find(|t| !IDENTIFIER.is_match(t)) {
            return Err(configuration_error(format!("Invalid table name: {}", bad)));
        }
        Ok(())
    }

    pub fn scans_all_tables(&self) -> bool {
        self.tables.len() == 1 && self.tables[0] == ALL_TABLES
    }

    pub fn target(&self) -> ScanTarget {
        if self.scans_all_tables() {
            ScanTarget::All
        } else {
            ScanTarget::Only(self.tables.clone())
        }
    }

    /// Whether the overlap pass runs; never over the full catalog
    pub fn samples_rows(&self) -> bool {
        self.sampling_enabled && !self.scans_all_tables()
    }
}

/// Complete application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub scan: ScanConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: env_parse("HOST").unwrap_or_else(|| ServerConfig::default().host),
            port: env_parse("PORT").unwrap_or_else(|| ServerConfig::default().port),
        };

        let max_pool_size = env_parse("DB_MAX_CONNECTIONS").unwrap_or(10);

        let database = if let Ok(database_url) = std::env::var("DATABASE_URL") {
            Self::parse_database_url(&database_url, max_pool_size)?
        } else {
            DatabaseConfig {
                host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: env_parse("DB_PORT").unwrap_or(5432),
                user: std::env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
                password: std::env::var("DB_PASSWORD").unwrap_or_default(),
                database: std::env::var("DB_NAME").unwrap_or_else(|_| "postgres".to_string()),
                max_pool_size,
                use_tls: env_parse("DB_TLS").unwrap_or(false),
            }
        };

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| parse_list(&s))
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let defaults = ScanConfig::default();
        let scan = ScanConfig {
            enabled: env_parse("SCAN_ENABLED").unwrap_or(defaults.enabled),
            owner: std::env::var("SCAN_OWNER").unwrap_or(defaults.owner),
            tables: std::env::var("SCAN_TABLES")
                .map(|s| parse_list(&s))
                .unwrap_or_default(),
            max_tables: env_parse("SCAN_MAX_TABLES").unwrap_or(defaults.max_tables),
            sampling_enabled: env_parse("SAMPLE_ENABLED").unwrap_or(defaults.sampling_enabled),
            sample_size: env_parse("SAMPLE_SIZE").unwrap_or(defaults.sample_size),
            chunk_size: env_parse("CHUNK_SIZE").unwrap_or(defaults.chunk_size),
            domains_file: std::env::var("DOMAINS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.domains_file),
        };

        Ok(Self {
            server,
            database,
            cors,
            scan,
        })
    }

    /// Parse a DATABASE_URL connection string (postgresql://...)
    fn parse_database_url(url: &str, max_pool_size: usize) -> Result<DatabaseConfig, ConfigError> {
        let parsed = url::Url::parse(url).map_err(|_| {
            ConfigError::InvalidValue(
                "Invalid DATABASE_URL format (expected postgresql://...)".to_string(),
            )
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
            .to_string();

        let use_tls = host.contains("neon.tech")
            || parsed
                .query_pairs()
                .any(|(k, v)| k == "sslmode" && v == "require");

        Ok(DatabaseConfig {
            port: parsed.port().unwrap_or(5432),
            user: parsed.username().to_string(),
            password: parsed.password().map(|p| p.to_string()).unwrap_or_default(),
            database: parsed.path().trim_start_matches('/').to_string(),
            host,
            max_pool_size,
            use_tls,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Split a comma-separated list, dropping blanks
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
