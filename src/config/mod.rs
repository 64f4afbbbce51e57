// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gateway configuration
//!
//! Everything is read once at startup from the process environment (after an
//! optional `.env` file has been loaded by the binary) and then shared
//! read-only between requests.

use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_EMBEDDING_MODEL: &str = "embedding-001";
pub const DEFAULT_VISION_MODEL: &str = "gemini-1.5-flash";

/// Default outbound request timeout in seconds
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Default inbound body limit (10MB)
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while loading configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Static configuration for the gateway and its upstream clients
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Qdrant REST base URL
    pub qdrant_url: String,
    /// Qdrant API key, sent as the `api-key` header when present
    pub qdrant_api_key: Option<String>,
    /// Gemini API key, sent as the `key` query parameter
    pub gemini_api_key: String,
    /// Gemini REST base URL
    pub gemini_base_url: String,
    /// Model used for `embedContent`
    pub embedding_model: String,
    /// Model used for `generateContent` image analysis
    pub vision_model: String,
    /// Shared secret callers present in `X-API-Key`
    pub service_api_key: String,
    /// Timeout applied to every outbound request
    pub upstream_timeout: Duration,
    /// Maximum inbound request body size
    pub max_upload_bytes: usize,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let qdrant_url = get("QDRANT_URL").ok_or(ConfigError::Missing("QDRANT_URL"))?;
        let gemini_api_key = get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;
        let service_api_key =
            get("SERVICE_API_KEY").ok_or(ConfigError::Missing("SERVICE_API_KEY"))?;

        let upstream_timeout_secs = match get("UPSTREAM_TIMEOUT_SECS") {
            Some(v) => v.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(v) => v.parse::<usize>().map_err(|e| ConfigError::Invalid {
                name: "MAX_UPLOAD_BYTES",
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let config = Self {
            qdrant_url: normalize_base_url("QDRANT_URL", &qdrant_url)?,
            qdrant_api_key: get("QDRANT_API_KEY"),
            gemini_api_key,
            gemini_base_url: normalize_base_url(
                "GEMINI_BASE_URL",
                &get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            )?,
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            vision_model: get("VISION_MODEL").unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            service_api_key,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            max_upload_bytes,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_SECS",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_UPLOAD_BYTES",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Parse a base URL and strip any trailing slash so paths can be appended
fn normalize_base_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
