use anyhow::Context;
use payment_gate::api::{create_router, AppState};
use payment_gate::config::Settings;
use payment_gate::middleware::GateConfig;
use payment_gate::observability::{init_logging, init_metrics};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;

    // Initialize logging
    init_logging(&settings.application.log_config())?;
    info!("Configuration loaded");

    let mut state = AppState::new(GateConfig::from(&settings.gate));
    if settings.application.metrics_enabled {
        state = state.with_metrics(init_metrics()?);
        info!("Prometheus recorder installed");
    }

    let address = settings.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(
        "Payment gate listening on {} (max body {} bytes)",
        address, settings.gate.max_body_bytes
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
