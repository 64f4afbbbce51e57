// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Save memory endpoint handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::memory::{MemoryRecord, SaveOutcome};

/// POST /save-memory/ - Embed text and save it to the vector store
///
/// # Request
/// - `text`: Text to remember (required)
/// - `metadata.collection`: Target collection (default `episodic_memory`)
/// - `metadata.source`: Where the memory came from (required)
/// - `metadata.timestamp`: ISO-8601 timestamp (required)
/// - `metadata.tags`: Free-form tags (default empty)
///
/// The metadata fields may also be given at the top level of the body.
///
/// # Response
/// `{"status": "success", "id": "<uuid>", "collection": "<name>"}`
///
/// # Errors
/// - 400 Bad Request: Malformed body or invalid fields
/// - 403 Forbidden: Missing or wrong `X-API-Key`
/// - 413 Payload Too Large: Body exceeds `MAX_UPLOAD_BYTES`
/// - 500 Internal Server Error: Embedding or vector store call failed
pub async fn save_memory_handler(
    State(state): State<AppState>,
    payload: Result<Json<MemoryRecord>, JsonRejection>,
) -> Result<Json<SaveOutcome>, ApiError> {
    let Json(record) = payload.map_err(ApiError::from)?;
    debug!(
        "Save request: {} chars into '{}'",
        record.text.len(),
        record.metadata.collection
    );

    let outcome = state.gateway.save(record).await?;
    Ok(Json(outcome))
}
