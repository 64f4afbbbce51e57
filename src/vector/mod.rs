// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vector store access
//!
//! Points and searches are forwarded to an external vector database over
//! REST. Nothing is indexed or cached locally.

pub mod qdrant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use qdrant::QdrantClient;

/// Errors returned by the vector store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{status} - {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// HTTP status reported by the store, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            StoreError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A single point written to a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorPoint {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub payload: serde_json::Value,
}

/// Nearest-neighbour query against a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilaritySearch {
    pub vector: Vec<f32>,
    pub limit: u32,
    pub with_payload: bool,
}

/// External vector database addressed by collection name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace one point, returning once the store acknowledges it
    async fn upsert(&self, collection: &str, point: VectorPoint) -> Result<(), StoreError>;

    /// Run a similarity search and return the store's response body as-is
    async fn search(
        &self,
        collection: &str,
        search: SimilaritySearch,
    ) -> Result<serde_json::Value, StoreError>;
}
