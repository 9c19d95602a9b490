/* Relay client: consegna un envelope al persistence worker.
    Una connessione per messaggio, si scrive tutto il payload e si chiude.
    Il worker non risponde mai, quindi "Ok" vuol dire solo "scritto sul socket".
*/
use bacheca_core::{encode, Envelope, WireError};
use std::time::Duration;
use thiserror::Error;
use tokio::{io::AsyncWriteExt, net::TcpStream, time::timeout};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("encode envelope: {0}")]
    Encode(#[from] WireError),

    #[error("connect to worker at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("write to worker: {0}")]
    Write(#[source] std::io::Error),

    #[error("worker at {addr} not reachable within {timeout:?}")]
    Timeout { addr: String, timeout: Duration },
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    addr: String,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into(), timeout: Duration::from_secs(5) }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Serializza e invia l'envelope. Non attende risposta dal worker.
    pub async fn send(&self, envelope: &Envelope) -> Result<(), RelayError> {
        let payload = encode(envelope)?;
        timeout(self.timeout, self.deliver(&payload))
            .await
            .map_err(|_| RelayError::Timeout { addr: self.addr.clone(), timeout: self.timeout })?
    }

    async fn deliver(&self, payload: &[u8]) -> Result<(), RelayError> {
        let mut stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|source| RelayError::Connect { addr: self.addr.clone(), source })?;
        stream.write_all(payload).await.map_err(RelayError::Write)?;
        // chiude il lato in scrittura: il worker legge fino a EOF
        stream.shutdown().await.map_err(RelayError::Write)?;
        Ok(())
    }
}
