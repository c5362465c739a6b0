//! Chat gateway — main entry point.
//!
//! Loads configuration, builds the credential pool (failing fast when no
//! API keys are configured), and serves the HTTP API.

use anyhow::Result;
use chatgpt_gateway::{
    api::{build_router, AppState},
    core::GatewayConfig,
    services::{ChatService, CredentialPool},
};
use chrono::Local;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Time formatter using the local timezone (respects the TZ environment
/// variable).
struct LocalTime;

impl tracing_subscriber::fmt::time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();

    // Suppress noisy HTTP library logs regardless of the RUST_LOG setting
    let base_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info,chatgpt_gateway=debug".to_string());
    let filter = tracing_subscriber::EnvFilter::new(format!(
        "{},hyper=warn,h2=warn,reqwest=warn",
        base_filter
    ));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_timer(LocalTime))
        .init();

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    let config = GatewayConfig::load(&config_path)?;

    // Credentials are created once here and never change afterwards; an
    // empty pool is a startup failure, not a per-request one.
    let pool = Arc::new(CredentialPool::from_config(&config)?);
    tracing::info!(
        credentials = pool.len(),
        api_base = %config.api_base,
        "credential pool initialized"
    );

    let chat_service = ChatService::from_config(&config, pool);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = Arc::new(AppState {
        config,
        chat_service,
    });
    let app = build_router(state);

    tracing::info!("starting chat gateway on {}", addr);
    tracing::info!("endpoints: POST /chat/sendMsg, POST /chatGPT/sendMsg, GET /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
