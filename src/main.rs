// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use memory_gateway::{api::start_server, cli::{env_file_arg, Cli}, version, AppState, GatewayConfig};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match env_file_arg(env::args()) {
        Some(path) => {
            dotenv::from_path(&path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            if let Err(e) = dotenv::dotenv() {
                if !e.not_found() {
                    warn!("Ignoring unreadable .env file: {}", e);
                }
            }
        }
    }

    let cli = Cli::parse();

    info!("Starting {}", version::get_version_string());

    let config = GatewayConfig::from_env().context("Invalid gateway configuration")?;
    info!(
        "Embedding model: {}, vision model: {}, upload limit: {} bytes",
        config.embedding_model, config.vision_model, config.max_upload_bytes
    );

    let state = AppState::from_config(&config)?;
    start_server(state, cli.socket_addr(), config.max_upload_bytes).await?;

    info!("Goodbye");
    Ok(())
}
