//! Error handling module
//!
//! Provides the unified error type for scanning, inference and rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Catalog connection failure: {0}")]
    ConnectionFailure(String),

    #[error("Unsupported database dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Schema not ready. Run POST /schema/scan first.")]
    SchemaNotReady,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Domain mapping missing: {0}")]
    DomainMappingMissing(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether the error comes from the catalog connection itself
    pub fn is_connection_failure(&self) -> bool {
        matches!(
            self,
            AppError::Database(_) | AppError::Pool(_) | AppError::ConnectionFailure(_)
        )
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "CONNECTION_FAILURE",
                    "A catalog query failed".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::Pool(e) => {
                error!("Pool error: {:?}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CONNECTION_FAILURE",
                    "Could not acquire a catalog connection".to_string(),
                    Some(e.to_string()),
                )
            }
            AppError::ConnectionFailure(msg) => {
                error!("Catalog connection failure: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "CONNECTION_FAILURE",
                    "Catalog access failed".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::UnsupportedDialect(product) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNSUPPORTED_DIALECT",
                format!("Unsupported database product: {}", product),
                None,
            ),
            AppError::SchemaNotReady => (
                StatusCode::NOT_FOUND,
                "SCHEMA_NOT_READY",
                self.to_string(),
                None,
            ),
            AppError::Configuration(msg) => {
                error!("Configuration error: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    "CONFIG_ERROR",
                    msg.clone(),
                    None,
                )
            }
            AppError::DomainMappingMissing(msg) => (
                StatusCode::NOT_FOUND,
                "DOMAIN_MAPPING_MISSING",
                "No domain mapping available for chunked rendering".to_string(),
                Some(msg.clone()),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                msg.clone(),
                None,
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
            error: details,
            code: Some(error_code.to_string()),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a configuration error
pub fn configuration_error(msg: impl Into<String>) -> AppError {
    AppError::Configuration(msg.into())
}

/// Helper function to create a bad request error
pub fn bad_request_error(msg: impl Into<String>) -> AppError {
    AppError::BadRequest(msg.into())
}
