//! Data models and DTOs (Data Transfer Objects)
//!
//! The scanned schema model plus the request/response structures used by
//! the API.

pub mod schema;

pub use schema::*;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Query for domain-chunked diagram rendering
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DomainChunksQuery {
    #[validate(range(min = 1, max = 500, message = "chunkSize must be between 1 and 500"))]
    pub chunk_size: Option<usize>,
}
