// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::memory::GatewayError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError {
        field: String,
        message: String,
    },
    Forbidden(String),
    /// Request body exceeded the configured upload limit
    PayloadTooLarge(String),
    /// An embedding, vision or vector-store call failed
    UpstreamError {
        upstream: &'static str,
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::Forbidden(msg) => ("forbidden", msg.clone(), None),
            ApiError::PayloadTooLarge(msg) => ("payload_too_large", msg.clone(), None),
            ApiError::UpstreamError {
                upstream,
                status,
                message,
            } => {
                let mut details = HashMap::new();
                details.insert(
                    "upstream".to_string(),
                    serde_json::Value::String(upstream.to_string()),
                );
                if let Some(status) = status {
                    details.insert(
                        "upstream_status".to_string(),
                        serde_json::Value::Number((*status).into()),
                    );
                }
                ("upstream_error", message.clone(), Some(details))
            }
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        }
    }

    /// Upstream failures all surface as 500; the upstream code stays in the body
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_) | ApiError::ValidationError { .. } => 400,
            ApiError::Forbidden(_) => 403,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::UpstreamError { .. } => 500,
        }
    }

    /// Map an extractor rejection, keeping 413 for oversized bodies
    pub fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(message)
        } else {
            ApiError::InvalidRequest(message)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::UpstreamError { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Validation(v) => ApiError::ValidationError {
                field: v.field,
                message: v.message,
            },
            other => ApiError::UpstreamError {
                upstream: other.upstream().unwrap_or("unknown"),
                status: other.upstream_status(),
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::UpstreamError {
            upstream, status, ..
        } = &self
        {
            warn!(
                "Upstream {} failed (status: {:?}): {}",
                upstream, status, self
            );
        }

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
