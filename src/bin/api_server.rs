// API Server Binary Entry Point
//
// Purpose: Serve the recommendation pipeline over HTTP
// Usage: cargo run --features api --bin api_server

use agromind::utils::init_logging;
use agromind::{create_router, AdvisorConfig, AppState};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default log level: info for our crate, debug for HTTP tracing, warn for others
    init_logging("agromind=info,tower_http=debug,axum=debug,warn");

    tracing::info!("Starting API server...");

    let config = AdvisorConfig::from_env()?;

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    tracing::info!("Configuration:");
    tracing::info!("  LANGUAGE: {:?}", config.language);
    tracing::info!("  THRESHOLDS: low {} / high {}", config.low_threshold, config.high_threshold);
    tracing::info!("  PORT: {}", port);

    let state = AppState::new(config)?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
