//! station-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and the
//! background state generator.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use station_gateway::app::{build_app, spawn_generator};
use station_gateway::app_state::AppState;
use station_gateway::config::{GatewayConfig, LogFormat};
use station_gateway::persistence::{InMemoryStationStore, PostgresStationStore, StationStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(addr = %config.listen_addr, "starting station-gateway");

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend(), "station store ready");

    let listen_addr = config.listen_addr;
    let state = AppState::new(store, config);
    let _generator = spawn_generator(&state);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    tracing::info!(addr = %listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn open_store(config: &GatewayConfig) -> anyhow::Result<StationStore> {
    if !config.persistence_enabled {
        let store = InMemoryStationStore::with_default_catalog().await?;
        return Ok(StationStore::Memory(store));
    }
    let store = PostgresStationStore::connect(config)
        .await
        .context("failed to connect to PostgreSQL")?;
    store.migrate().await.context("failed to run migrations")?;
    let seeded = store.seed_if_empty().await?;
    if seeded > 0 {
        tracing::info!(seeded, "seeded default station catalog");
    }
    Ok(StationStore::Postgres(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
