use clap::Parser;
use std::{path::PathBuf, time::Duration};

pub mod controllers;
pub mod pages;
pub mod relay;
pub mod routes;

pub use pages::Pages;
pub use relay::{RelayClient, RelayError};
pub use routes::router;

#[derive(Clone)]
pub struct AppState {
    /// Client verso il persistence worker, una connessione nuova per ogni messaggio.
    pub relay: RelayClient,
    pub pages: Pages,
}

/// Configurazione dell'intake service, da argomenti o variabili d'ambiente.
#[derive(Debug, Clone, Parser)]
#[command(name = "bacheca-server", version, about = "Intake service for bacheca")]
pub struct IntakeConfig {
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// Indirizzo del socket del persistence worker
    #[arg(long, env = "RELAY_ADDR", default_value = "127.0.0.1:5000")]
    pub relay_addr: String,

    /// Timeout complessivo di connect + invio verso il worker
    #[arg(long, env = "RELAY_TIMEOUT_MS", default_value_t = 5000)]
    pub relay_timeout_ms: u64,

    #[arg(long, env = "TEMPLATES_DIR", default_value = "templates")]
    pub templates: PathBuf,

    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

impl IntakeConfig {
    pub fn app_state(&self) -> AppState {
        AppState {
            relay: RelayClient::new(self.relay_addr.clone())
                .with_timeout(Duration::from_millis(self.relay_timeout_ms)),
            pages: Pages::new(self.templates.clone(), self.static_dir.clone()),
        }
    }
}
