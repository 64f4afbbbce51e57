// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Qdrant REST client
//!
//! Only the two point endpoints the gateway needs are wrapped:
//! `PUT /collections/{name}/points` and `POST /collections/{name}/points/search`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{SimilaritySearch, StoreError, VectorPoint, VectorStore};

#[derive(Serialize)]
struct UpsertPointsRequest<'a> {
    points: [&'a VectorPoint; 1],
}

/// Client for a Qdrant instance
pub struct QdrantClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl QdrantClient {
    /// Create a new Qdrant client
    ///
    /// # Arguments
    /// * `base_url` - Qdrant REST URL, e.g. `https://xyz.cloud.qdrant.io:6333`
    /// * `api_key` - Sent as the `api-key` header when present
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        info!(
            "Qdrant client configured: base_url={}, api_key={}",
            base_url,
            if api_key.is_some() { "set" } else { "none" }
        );

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn points_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/points", self.base_url, collection)
    }

    fn with_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("api-key", key),
            None => builder,
        }
    }

    async fn send(builder: RequestBuilder) -> Result<Response, StoreError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl VectorStore for QdrantClient {
    async fn upsert(&self, collection: &str, point: VectorPoint) -> Result<(), StoreError> {
        let request = UpsertPointsRequest { points: [&point] };
        let builder = self
            .client
            .put(self.points_url(collection))
            .query(&[("wait", "true")])
            .json(&request);

        Self::send(self.with_auth(builder)).await?;
        debug!("Upserted point {} into '{}'", point.id, collection);
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        search: SimilaritySearch,
    ) -> Result<serde_json::Value, StoreError> {
        let builder = self
            .client
            .post(format!("{}/search", self.points_url(collection)))
            .json(&search);

        let response = Self::send(self.with_auth(builder)).await?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }
}
