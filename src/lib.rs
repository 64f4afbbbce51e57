// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod memory;
pub mod vector;
pub mod version;
pub mod vision;

pub use api::{create_router, start_server, ApiError, AppState};
pub use config::{ConfigError, GatewayConfig};
pub use embeddings::{EmbeddingError, EmbeddingProvider, GeminiEmbeddingClient};
pub use memory::{
    GatewayError, MemoryGateway, MemoryMetadata, MemoryRecord, SaveOutcome, SearchQuery,
};
pub use vector::{QdrantClient, SimilaritySearch, StoreError, VectorPoint, VectorStore};
pub use vision::{GeminiVisionClient, ImageInput, VisionError, VisionProvider};
