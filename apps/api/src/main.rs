mod config;
mod errors;
mod extract;
mod llm_client;
mod models;
mod routes;
mod state;
mod tracker;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::backend_from_config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tracker::store::TrackerStore;

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

    info!("Starting Trackfolio API v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(TrackerStore::new(config.data_file.clone()));
    info!("Tracker file: {}", store.path().display());

    let llm = backend_from_config(&config);
    match &llm {
        Some(backend) => info!("LLM backend initialized (model: {})", backend.model()),
        None => warn!(
            "{} is not set; submissions will be rejected until a credential is configured",
            config.backend.credential_var()
        ),
    }

    let state = AppState { store, llm };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
