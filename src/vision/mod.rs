// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image analysis providers
//!
//! Turns an uploaded image into text (a transcription for diagrams and
//! documents, a description for photos) so it can be embedded like any other
//! memory.

pub mod gemini;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use gemini::GeminiVisionClient;

/// Prompt sent alongside every uploaded image
pub const ANALYSIS_PROMPT: &str = "Analyze this image in detail. If it contains text (like a diagram or knowledge map), transcribe it exactly. If it is a photo or illustration, describe its contents, style, and any notable features.";

/// Errors returned by a vision provider
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("{status} - {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// 2xx response without any text candidate
    #[error("response contained no description text")]
    EmptyResponse,
}

impl VisionError {
    /// HTTP status reported by the provider, if any
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            VisionError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Raw image bytes with their declared MIME type
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub data: Bytes,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Converts an image into descriptive text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisionProvider: Send + Sync {
    async fn describe(&self, image: &ImageInput) -> Result<String, VisionError>;
}
