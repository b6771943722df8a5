mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::Analyzer;
use crate::config::Config;
use crate::llm_client::build_http_client;
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RoleMatch API v{}", env!("CARGO_PKG_VERSION"));

    let http = build_http_client(config.llm.timeout_secs)
        .context("Failed to build outbound HTTP client")?;
    let analyzer = Analyzer::new(config.llm.clone(), http);

    // Provider settings are checked per request; surface problems early in the log.
    match analyzer.provider() {
        Ok(provider) => info!(
            "LLM provider: {} (timeout {}s)",
            provider.name(),
            config.llm.timeout_secs
        ),
        Err(e) => warn!("LLM provider not usable, /analyze will fail: {e}"),
    }

    let state = AppState { analyzer };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origin)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
