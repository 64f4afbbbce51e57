// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Memory records, search queries and their validation

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::vision::ImageInput;

/// Collection used when a request does not name one
pub const DEFAULT_COLLECTION: &str = "episodic_memory";

/// Number of matches returned when a search does not set a limit
pub const DEFAULT_SEARCH_LIMIT: u32 = 3;

/// Source prefix and tag applied to memories created from images
pub const IMAGE_UPLOAD_TAG: &str = "image_upload";

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

/// A request field that failed validation
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Validation error for {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Descriptive fields stored next to the text of a memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMetadata {
    #[serde(default = "default_collection")]
    pub collection: String,
    pub source: String,
    /// ISO-8601 timestamp supplied by the caller, stored verbatim
    pub timestamp: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A piece of text to embed and store
///
/// Accepts both `{"text", "metadata": {...}}` and the flat
/// `{"text", "collection", "source", "timestamp", "tags"}` body. The presence
/// of a `metadata` key selects the nested shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MemoryRecordWire")]
pub struct MemoryRecord {
    pub text: String,
    pub metadata: MemoryMetadata,
}

/// Metadata keys that belong under `metadata` in the nested shape
const METADATA_KEYS: [&str; 4] = ["collection", "source", "timestamp", "tags"];

#[derive(Deserialize)]
struct MemoryRecordWire {
    text: String,
    metadata: Option<MemoryMetadata>,
    #[serde(flatten)]
    rest: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<MemoryRecordWire> for MemoryRecord {
    type Error = String;

    fn try_from(wire: MemoryRecordWire) -> Result<Self, Self::Error> {
        let metadata = match wire.metadata {
            Some(metadata) => {
                if let Some(key) = METADATA_KEYS.iter().find(|k| wire.rest.contains_key(**k)) {
                    return Err(format!(
                        "`{}` must be inside `metadata` when `metadata` is given",
                        key
                    ));
                }
                metadata
            }
            None => serde_json::from_value(serde_json::Value::Object(wire.rest))
                .map_err(|e| e.to_string())?,
        };

        Ok(Self {
            text: wire.text,
            metadata,
        })
    }
}

impl MemoryRecord {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::new("text", "text cannot be empty"));
        }
        validate_collection(&self.metadata.collection)
    }

    /// Point payload: the metadata plus the raw text
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "collection": self.metadata.collection,
            "source": self.metadata.source,
            "timestamp": self.metadata.timestamp,
            "tags": self.metadata.tags,
            "text": self.text,
        })
    }
}

/// A similarity search over one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl SearchQuery {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.query.trim().is_empty() {
            return Err(ValidationError::new("query", "query cannot be empty"));
        }
        if self.limit == 0 {
            return Err(ValidationError::new("limit", "limit must be at least 1"));
        }
        validate_collection(&self.collection)
    }
}

/// An image received through the upload form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub collection: String,
    pub source: String,
    pub image: ImageInput,
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.image.data.is_empty() {
            return Err(ValidationError::new("file", "uploaded file is empty"));
        }
        if !self.image.mime_type.starts_with("image/") {
            return Err(ValidationError::new(
                "file",
                format!("unsupported content type '{}'", self.image.mime_type),
            ));
        }
        if self.source.trim().is_empty() {
            return Err(ValidationError::new("source", "source cannot be empty"));
        }
        validate_collection(&self.collection)
    }
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub status: String,
    pub id: Uuid,
    pub collection: String,
}

impl SaveOutcome {
    pub fn success(id: Uuid, collection: String) -> Self {
        Self {
            status: "success".to_string(),
            id,
            collection,
        }
    }
}

/// Collection names end up in the store URL path
pub fn validate_collection(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("collection", "collection cannot be empty"));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#' | '%'))
    {
        return Err(ValidationError::new(
            "collection",
            format!("invalid collection name '{}'", name),
        ));
    }
    Ok(())
}
