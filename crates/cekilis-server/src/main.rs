//! Giveaway administration panel binary.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `cekilis-config.yaml`
//! 3. Connect the store (running migrations for `PostgreSQL`) and the
//!    auth backend
//! 4. Serve HTTP until a shutdown signal arrives

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use cekilis_server::config::AppConfig;
use cekilis_server::startup::build_state;
use cekilis_server::start_server;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Configuration file, relative to the working directory.
const CONFIG_PATH: &str = "cekilis-config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("cekilis-server starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        store = ?config.store.backend,
        auth = ?config.auth.backend,
        "Configuration loaded"
    );

    // 3. Build backends and state.
    let state = build_state(&config)
        .await
        .context("failed to initialize application state")?;

    // 4. Serve.
    start_server(&config.server, Arc::new(state))
        .await
        .context("server failed")?;

    info!("cekilis-server exiting");
    Ok(())
}

/// Load configuration from `cekilis-config.yaml`, falling back to
/// defaults (plus environment overrides) when the file is absent.
fn load_config() -> anyhow::Result<AppConfig> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        AppConfig::from_file(config_path).with_context(|| format!("failed to load {CONFIG_PATH}"))
    } else {
        info!("Config file not found, using defaults");
        let mut config = AppConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }
}
