// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::auth::require_api_key;
use super::save_memory::save_memory_handler;
use super::search_memory::search_memory_handler;
use super::upload_image::upload_image_handler;
use crate::config::GatewayConfig;
use crate::memory::MemoryGateway;
use crate::version;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<MemoryGateway>,
    pub service_api_key: Arc<str>,
}

impl AppState {
    pub fn new(gateway: Arc<MemoryGateway>, service_api_key: &str) -> Self {
        Self {
            gateway,
            service_api_key: Arc::from(service_api_key),
        }
    }

    /// Build the state and its upstream clients from configuration
    pub fn from_config(config: &GatewayConfig) -> anyhow::Result<Self> {
        let gateway = MemoryGateway::from_config(config)?;
        Ok(Self::new(Arc::new(gateway), &config.service_api_key))
    }
}

/// Build the application router
///
/// Memory routes sit behind the API-key middleware and are served with and
/// without a trailing slash. `/health` is public.
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    let memory_routes = Router::new()
        .route("/save-memory/", post(save_memory_handler))
        .route("/save-memory", post(save_memory_handler))
        .route("/search-memory/", post(search_memory_handler))
        .route("/search-memory", post(search_memory_handler))
        .route("/upload-image/", post(upload_image_handler))
        .route("/upload-image", post(upload_image_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(memory_routes)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve the gateway until Ctrl+C
pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    max_body_bytes: usize,
) -> anyhow::Result<()> {
    let app = create_router(state, max_body_bytes);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn health_handler() -> impl IntoResponse {
    let mut info = version::get_version_info();
    info["status"] = serde_json::Value::from("ok");
    Json(info)
}
