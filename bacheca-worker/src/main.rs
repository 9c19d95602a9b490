use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bacheca_worker::{bind, build_sqlite_url, SqliteStore, Worker, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = WorkerConfig::parse();
    let db_url = build_sqlite_url(&config.database_url).context("build sqlite DATABASE_URL")?;
    info!(%db_url, "using database");
    // Lo store vive per tutta la durata del processo
    let store = SqliteStore::open(&db_url).await.context("open message store")?;

    let listener = bind(&config.bind).await?;
    info!(addr = %config.bind, "worker listening");

    Worker::from_config(&config, Arc::new(store))
        .serve(listener)
        .await
        .context("worker shutdown")
}
