//! # telemetryd — telemetry collector daemon
//!
//! Composition root for the temperature collection endpoint: loads the
//! configuration, builds the collector state (in-memory session set plus the
//! CSV audit log), and serves the ingestion API.

mod config;

use homenode_adapter_telemetry_server::{AppState, CsvStore};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let store = CsvStore::new(&config.storage.csv_path);
    let app = homenode_adapter_telemetry_server::router(AppState::new(store));

    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, csv = %config.storage.csv_path, "collector listening");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
