//! bacheca-worker: riceve un envelope per connessione TCP, aggiunge la data
//! di ricezione e lo inserisce nello store.

use clap::Parser;

pub mod listener;
pub mod store;

pub use listener::{bind, ConnectionOutcome, Worker};
pub use store::{build_sqlite_url, connect_pool, run_migrations, sqlite_url_for_path, MessageStore, SqliteStore};

/// Configurazione del worker, da argomenti o variabili d'ambiente.
#[derive(Debug, Clone, Parser)]
#[command(name = "bacheca-worker", version, about = "Persistence worker for bacheca")]
pub struct WorkerConfig {
    /// Indirizzo su cui ascolta il socket interno
    #[arg(long, env = "WORKER_ADDR", default_value = "0.0.0.0:5000")]
    pub bind: String,

    /// Percorso del file SQLite, URL `sqlite://...` oppure `sqlite::memory:`
    #[arg(long, env = "DATABASE_URL", default_value = "bacheca.db")]
    pub database_url: String,

    #[arg(long, env = "MAX_FRAME", default_value_t = bacheca_core::MAX_FRAME)]
    pub max_frame: usize,

    #[arg(long, env = "READ_TIMEOUT_MS", default_value_t = 5000)]
    pub read_timeout_ms: u64,
}
