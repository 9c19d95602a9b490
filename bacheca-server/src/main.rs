use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ri-utilizziamo le funzioni e strutture definite in lib.rs
use bacheca_server::{router, IntakeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = IntakeConfig::parse();
    // Crea lo stato dell'applicazione condiviso
    let state = Arc::new(config.app_state());
    let app = router(state);

    // converte la stringa bind in un SocketAddr
    let addr: SocketAddr = config.bind.parse().context("parse BIND_ADDR")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind tcp listener")?;
    tracing::info!(%addr, relay = %config.relay_addr, "intake listening");

    axum::serve(listener, app.into_make_service())
        .await
        .context("server shutdown")?;

    Ok(())
}
