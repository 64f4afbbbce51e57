// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Save, search and image-upload pipelines
//!
//! Every operation is a straight line of awaited upstream calls. A failure at
//! any step abandons the request; nothing is retried or rolled back.

use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{
    ImageUpload, MemoryMetadata, MemoryRecord, SaveOutcome, SearchQuery, ValidationError,
    IMAGE_UPLOAD_TAG,
};
use crate::config::GatewayConfig;
use crate::embeddings::{EmbeddingError, EmbeddingProvider, GeminiEmbeddingClient};
use crate::vector::{QdrantClient, SimilaritySearch, StoreError, VectorPoint, VectorStore};
use crate::vision::{GeminiVisionClient, VisionError, VisionProvider};

/// Errors produced by the gateway pipelines
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error calling embedding API: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Error calling vision API: {0}")]
    Vision(#[from] VisionError),

    #[error("Error calling vector store API: {0}")]
    Store(#[from] StoreError),
}

impl GatewayError {
    /// Status code returned by the failing upstream, if it answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            GatewayError::Validation(_) => None,
            GatewayError::Embedding(e) => e.upstream_status(),
            GatewayError::Vision(e) => e.upstream_status(),
            GatewayError::Store(e) => e.upstream_status(),
        }
    }

    /// Name of the upstream that failed, if any
    pub fn upstream(&self) -> Option<&'static str> {
        match self {
            GatewayError::Validation(_) => None,
            GatewayError::Embedding(_) => Some("embedding"),
            GatewayError::Vision(_) => Some("vision"),
            GatewayError::Store(_) => Some("vector_store"),
        }
    }
}

/// Relays memories between callers, the model provider and the vector store
pub struct MemoryGateway {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    vision: Arc<dyn VisionProvider>,
}

impl MemoryGateway {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        vision: Arc<dyn VisionProvider>,
    ) -> Self {
        Self {
            embedder,
            store,
            vision,
        }
    }

    /// Build the Gemini and Qdrant clients described by `config`
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let embedder = GeminiEmbeddingClient::new(
            &config.gemini_base_url,
            &config.gemini_api_key,
            &config.embedding_model,
            config.upstream_timeout,
        )?;
        let vision = GeminiVisionClient::new(
            &config.gemini_base_url,
            &config.gemini_api_key,
            &config.vision_model,
            config.upstream_timeout,
        )?;
        let store = QdrantClient::new(
            &config.qdrant_url,
            config.qdrant_api_key.clone(),
            config.upstream_timeout,
        )?;

        Ok(Self::new(Arc::new(embedder), Arc::new(store), Arc::new(vision)))
    }

    /// Embed `record.text` and upsert it as a new point
    pub async fn save(&self, record: MemoryRecord) -> Result<SaveOutcome, GatewayError> {
        record.validate()?;

        let vector = self.embedder.embed(&record.text).await?;
        let id = Uuid::new_v4();
        let point = VectorPoint {
            id,
            vector,
            payload: record.to_payload(),
        };

        let collection = record.metadata.collection;
        self.store.upsert(&collection, point).await?;

        info!("Saved memory {} into '{}'", id, collection);
        Ok(SaveOutcome::success(id, collection))
    }

    /// Embed the query text and return the store's search response verbatim
    pub async fn search(&self, query: SearchQuery) -> Result<serde_json::Value, GatewayError> {
        query.validate()?;

        let vector = self.embedder.embed(&query.query).await?;
        let search = SimilaritySearch {
            vector,
            limit: query.limit,
            with_payload: true,
        };

        let results = self.store.search(&query.collection, search).await?;
        debug!(
            "Search in '{}' (limit {}) completed",
            query.collection, query.limit
        );
        Ok(results)
    }

    /// Describe an image and save the description as a memory
    pub async fn upload_image(&self, upload: ImageUpload) -> Result<SaveOutcome, GatewayError> {
        upload.validate()?;

        let description = self.vision.describe(&upload.image).await?;
        if description.trim().is_empty() {
            return Err(VisionError::EmptyResponse.into());
        }
        debug!(
            "Image {:?} from '{}' described in {} chars",
            upload.file_name,
            upload.source,
            description.len()
        );

        let record = MemoryRecord {
            text: description,
            metadata: MemoryMetadata {
                collection: upload.collection,
                source: format!("{}/{}", IMAGE_UPLOAD_TAG, upload.source),
                timestamp: utc_timestamp(),
                tags: vec![IMAGE_UPLOAD_TAG.to_string(), upload.source],
            },
        };

        self.save(record).await
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.ffffffZ`
fn utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}
