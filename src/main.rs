//! Attendance Penalty Engine HTTP server.
//!
//! Environment:
//! - `PENALTY_CONFIG_DIR`: policy directory (default `./config/attendance_penalties`)
//! - `BIND_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `RUST_LOG`: tracing filter (default `attendance_penalty_engine=info`)

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;

use attendance_penalty_engine::api::{AppState, create_router};
use attendance_penalty_engine::config::ConfigLoader;

const DEFAULT_CONFIG_DIR: &str = "./config/attendance_penalties";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_penalty_engine=info".into()),
        )
        .init();

    let config_dir =
        std::env::var("PENALTY_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)
        .with_context(|| format!("loading penalty policy from {}", config_dir))?;

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be host:port")?;

    let app = create_router(AppState::new(config));

    info!("Starting Attendance Penalty Engine on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
