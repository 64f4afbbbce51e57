// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text embedding providers
//!
//! The gateway never computes embeddings itself; it asks a remote model
//! endpoint for one vector per input text and passes it on to the vector
//! store untouched.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiEmbeddingClient;

/// Errors returned by an embedding provider
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The request never produced an HTTP response
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider answered with a non-success status
    #[error("{status} - {message}")]
    Status { status: u16, message: String },

    /// The provider answered 2xx but the body was not an embedding
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl EmbeddingError {
    /// HTTP status reported by the provider, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            EmbeddingError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Converts a piece of text into a vector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
