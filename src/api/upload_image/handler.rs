// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload image endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::{multipart::MultipartRejection, Multipart};
use tracing::debug;

use super::form::read_upload_form;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::memory::SaveOutcome;

/// POST /upload-image/ - Analyze an image and save its description
///
/// # Request (multipart/form-data)
/// - `collection`: Target collection (required)
/// - `source`: Where the image came from (required)
/// - `file`: The image, with its MIME type as the part's content type
///
/// The description is stored with source `image_upload/<source>` and tags
/// `["image_upload", <source>]`.
///
/// # Response
/// `{"status": "success", "id": "<uuid>", "collection": "<name>"}`
///
/// # Errors
/// - 400 Bad Request: Malformed form, missing fields, empty or non-image file
/// - 403 Forbidden: Missing or wrong `X-API-Key`
/// - 413 Payload Too Large: Body exceeds `MAX_UPLOAD_BYTES`
/// - 500 Internal Server Error: Vision, embedding or vector store call failed
pub async fn upload_image_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SaveOutcome>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let upload = read_upload_form(&mut multipart).await?;
    debug!(
        "Image upload: {} bytes ({}) from '{}'",
        upload.image.data.len(),
        upload.image.mime_type,
        upload.source
    );

    let outcome = state.gateway.upload_image(upload).await?;
    Ok(Json(outcome))
}
