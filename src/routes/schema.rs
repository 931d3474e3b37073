//! Schema scan and diagram route handlers
//!
//! Scans run against the configured catalog; every read route serves the
//! schema published by the last successful scan.

use crate::domains::DomainMapping;
use crate::error::{bad_request_error, ApiResult, AppError};
use crate::models::{DomainChunksQuery, Schema, SuccessResponse};
use crate::render::{DiagramSerializer, GraphDocument};
use crate::snapshot::{ScanReport, ScanService};
use crate::state::SharedState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{Map, Value};
use tracing::{debug, info};
use validator::Validate;

/// Scan the configured tables and publish the result
pub async fn scan_schema(
    State(state): State<SharedState>,
) -> ApiResult<Json<SuccessResponse<ScanReport>>> {
    let _guard = state
        .scan_lock
        .try_lock()
        .map_err(|_| AppError::Conflict("A schema scan is already running".to_string()))?;

    let report = ScanService::run(state.catalog.as_ref(), &state.scan, &state.schemas).await?;

    info!(
        "Scan published {} tables ({} strict, {} name-inferred, {} data-overlap)",
        report.table_count,
        report.strict_count,
        report.name_inferred_count,
        report.data_overlap_count
    );

    Ok(Json(SuccessResponse::with_data(
        "Schema scanned successfully for configured tables.",
        report,
    )))
}

/// Full schema document
pub async fn get_schema_json(State(state): State<SharedState>) -> ApiResult<Json<Schema>> {
    let schema = state.schemas.get().await?;
    Ok(Json(schema.as_ref().clone()))
}

/// Node/edge graph document
pub async fn get_schema_graph(State(state): State<SharedState>) -> ApiResult<Json<GraphDocument>> {
    let schema = state.schemas.get().await?;
    Ok(Json(DiagramSerializer::graph(&schema)))
}

/// Whole-schema ER diagram
pub async fn get_er_mermaid(State(state): State<SharedState>) -> ApiResult<String> {
    let schema = state.schemas.get().await?;
    Ok(DiagramSerializer::er_diagram(&schema))
}

/// Domain-chunked ER diagrams keyed by chunk name
pub async fn get_er_mermaid_domains(
    State(state): State<SharedState>,
    Query(query): Query<DomainChunksQuery>,
) -> ApiResult<Json<Map<String, Value>>> {
    query.validate().map_err(|e| bad_request_error(e.to_string()))?;

    let schema = state.schemas.get().await?;
    let mapping = DomainMapping::load(&state.scan.domains_file).await?;
    let chunk_size = query.chunk_size.unwrap_or(state.scan.chunk_size);

    let chunks = DiagramSerializer::domain_chunks(&schema, &mapping, chunk_size)?;
    debug!("Rendered {} domain diagrams", chunks.len());

    Ok(Json(
        chunks
            .into_iter()
            .map(|chunk| (chunk.key, Value::String(chunk.diagram)))
            .collect(),
    ))
}
