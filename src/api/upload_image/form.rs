// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart form parsing for image uploads

use axum_extra::extract::{multipart::MultipartError, Multipart};
use bytes::Bytes;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::memory::ImageUpload;
use crate::vision::ImageInput;

/// MIME type assumed when the file part does not declare one
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Fields collected from the form before they are checked for completeness
#[derive(Debug, Default)]
pub struct UploadForm {
    pub collection: Option<String>,
    pub source: Option<String>,
    pub file: Option<UploadedFile>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub data: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

impl UploadForm {
    /// Convert into an upload, failing on the first missing field
    pub fn finish(self) -> Result<ImageUpload, ApiError> {
        let collection = self.collection.ok_or_else(|| missing("collection"))?;
        let source = self.source.ok_or_else(|| missing("source"))?;
        let file = self.file.ok_or_else(|| missing("file"))?;

        Ok(ImageUpload {
            collection,
            source,
            image: ImageInput::new(file.data, file.content_type),
            file_name: file.file_name,
        })
    }
}

fn missing(field: &str) -> ApiError {
    ApiError::ValidationError {
        field: field.to_string(),
        message: format!("{} is required", field),
    }
}

fn malformed(err: MultipartError) -> ApiError {
    ApiError::from_rejection(err.status(), err.body_text())
}

/// Read `collection`, `source` and `file` from a multipart body
///
/// Unknown fields are skipped. When a field repeats, the last one wins.
pub async fn read_upload_form(multipart: &mut Multipart) -> Result<ImageUpload, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "collection" => form.collection = Some(field.text().await.map_err(malformed)?),
            "source" => form.source = Some(field.text().await.map_err(malformed)?),
            "file" => {
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(malformed)?;
                form.file = Some(UploadedFile {
                    data,
                    content_type,
                    file_name,
                });
            }
            other => debug!("Ignoring unexpected form field '{}'", other),
        }
    }

    form.finish()
}
