// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Search memory endpoint handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::memory::SearchQuery;

/// POST /search-memory/ - Search for relevant memories
///
/// # Request
/// - `query`: Text to search for (required)
/// - `collection`: Collection to search (default `episodic_memory`)
/// - `limit`: Maximum matches (default 3)
///
/// # Response
/// The vector store's search response body, unmodified.
///
/// # Errors
/// - 400 Bad Request: Malformed body or invalid fields
/// - 403 Forbidden: Missing or wrong `X-API-Key`
/// - 413 Payload Too Large: Body exceeds `MAX_UPLOAD_BYTES`
/// - 500 Internal Server Error: Embedding or vector store call failed
pub async fn search_memory_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchQuery>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(query) = payload.map_err(ApiError::from)?;
    debug!("Search request: {:?} in '{}'", query.query, query.collection);

    let results = state.gateway.search(query).await?;
    Ok(Json(results))
}
