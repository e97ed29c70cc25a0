// UDP to WebSocket telemetry bridge for Assetto Corsa dashboards.

use std::net::SocketAddr;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::info;

use ac_dash_bridge::app::AppState;
use ac_dash_bridge::bridge::{BridgeSettings, TelemetryBridge};
use ac_dash_bridge::config::BridgeConfig;
use ac_dash_bridge::constants::TELEMETRY_ROUTE;
use ac_dash_bridge::http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = BridgeConfig::from_env().context("invalid configuration")?;
    let app_state = AppState::new(config.feed_capacity);
    let cancel = CancellationToken::new();

    let bridge = TelemetryBridge::new(BridgeSettings::from(&config), &app_state)
        .spawn(cancel.clone());

    let app = http::router(app_state, &config.allowed_origins);
    let shutdown = cancel.clone();

    info!(
        addr = %config.http_addr,
        route = TELEMETRY_ROUTE,
        sim_host = %config.sim_host,
        sim_port = config.sim_port,
        "starting server"
    );
    axum::Server::try_bind(&config.http_addr)
        .with_context(|| format!("failed to bind {}", config.http_addr))?
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
            shutdown.cancel();
        })
        .await
        .context("server failed")?;

    cancel.cancel();
    let _ = bridge.await;
    Ok(())
}
