//! CentCom sync server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p centcom-server
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use anyhow::Context;
use centcom_common::{try_init_tracing_with_config, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Pick up APP_ENV from .env before the subscriber is chosen
    let _ = dotenvy::dotenv();
    let env = std::env::var("APP_ENV")
        .ok()
        .and_then(|value| value.parse::<Environment>().ok())
        .unwrap_or_default();

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = ?e, "Server stopped with an error");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting CentCom sync server...");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    info!(
        env = ?config.app.env,
        interval_secs = config.sync.interval_secs,
        full_refresh_interval_secs = config.sync.full_refresh_interval_secs,
        "Configuration loaded"
    );

    centcom_server::run(config).await?;

    Ok(())
}
