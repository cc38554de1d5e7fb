//! Receipt OCR server
//!
//! Entry point: loads configuration, builds the storage client and serves
//! the web UI.

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing::info;

use receipt_ocr::config::AppConfig;
use receipt_ocr::server;
use receipt_ocr::storage::{StorageClientFactory, StorageError};
use receipt_ocr::telemetry;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before anything reads the environment
    let _ = dotenv();

    telemetry::init();

    let config = Arc::new(AppConfig::load().context("Failed to load configuration")?);
    info!(
        name: "config.loaded",
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let client = match StorageClientFactory::create(&config.storage) {
        Ok(client) => client,
        Err(StorageError::Configuration(msg)) => {
            tracing::error!(name: "storage.config.invalid", error = %msg, "Configuration error");
            eprintln!("Configuration error: {msg}");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    server::start_server(config, client).await
}
