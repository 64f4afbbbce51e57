// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared-secret authentication for the memory endpoints

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::errors::ApiError;
use super::http_server::AppState;

/// Header carrying the caller's credential
pub const API_KEY_HEADER: &str = "x-api-key";

/// Authentication error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing X-API-Key header")]
    MissingKey,

    #[error("Invalid API key")]
    InvalidKey,
}

/// Check the `X-API-Key` header against the configured secret
pub fn verify_api_key(headers: &HeaderMap, expected: &str) -> Result<(), AuthError> {
    let presented = headers
        .get(API_KEY_HEADER)
        .ok_or(AuthError::MissingKey)?
        .as_bytes();

    if constant_time_eq(presented, expected.as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::InvalidKey)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Router middleware rejecting unauthenticated requests before any extractor runs
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Err(e) = verify_api_key(request.headers(), &state.service_api_key) {
        warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        return Err(ApiError::Forbidden(
            "Could not validate credentials".to_string(),
        ));
    }
    Ok(next.run(request).await)
}
