/* Accept loop del worker.
    Ogni connessione porta al massimo un envelope e produce al massimo un inserimento.
    Il protocollo è a senso unico: al mittente non si risponde mai.
*/
use anyhow::Context;
use bacheca_core::{decode, now_timestamp, Clock};
use std::{sync::Arc, time::Duration};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    net::TcpListener,
    time::timeout,
};
use tracing::{debug, error, info, warn};

use crate::{store::MessageStore, WorkerConfig};

/// Come è finita una singola connessione.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// Il peer ha chiuso senza inviare nulla.
    Empty,
    /// Errore di trasporto durante la lettura.
    ReadFailed,
    /// Payload troppo grande o non decodificabile.
    Malformed,
    Stored,
    /// Lo store ha rifiutato l'inserimento; il messaggio è perso.
    StoreFailed,
}

/// Apre il listener del worker. Se il bind fallisce il processo non può partire.
pub async fn bind(addr: &str) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind worker listener on {}", addr))
}

#[derive(Clone)]
pub struct Worker {
    store: Arc<dyn MessageStore>,
    clock: Clock,
    max_frame: usize,
    read_timeout: Duration,
}

impl Worker {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self {
            store,
            clock: Clock::Local,
            max_frame: bacheca_core::MAX_FRAME,
            read_timeout: Duration::from_secs(5),
        }
    }

    pub fn from_config(config: &WorkerConfig, store: Arc<dyn MessageStore>) -> Self {
        Self::new(store)
            .with_max_frame(config.max_frame)
            .with_read_timeout(Duration::from_millis(config.read_timeout_ms))
    }

    /// Orologio usato per la data dei record, ora locale se non specificato.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_frame(mut self, max_frame: usize) -> Self {
        self.max_frame = max_frame;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Accetta connessioni finché il processo vive. Ogni connessione gira nel suo task,
    /// quindi l'ordine di inserimento tra connessioni diverse non è definito.
    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    let worker = self.clone();
                    tokio::spawn(async move {
                        let outcome = worker.handle_connection(stream).await;
                        debug!(%peer, ?outcome, "connection closed");
                    });
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    // evita di girare a vuoto se finiscono i file descriptor
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }

    /// Legge un envelope dallo stream, lo marca con la data e lo inserisce.
    /// Nessun errore esce da qui: tutto viene loggato e ridotto a un [`ConnectionOutcome`].
    pub async fn handle_connection<S>(&self, stream: S) -> ConnectionOutcome
    where
        S: AsyncRead + Unpin,
    {
        let mut buf = Vec::with_capacity(self.max_frame.min(bacheca_core::MAX_FRAME));
        // un byte oltre il limite basta per sapere che il payload è troppo grande
        let mut reader = stream.take((self.max_frame as u64).saturating_add(1));
        let read = timeout(self.read_timeout, reader.read_to_end(&mut buf)).await;

        match read {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "read failed, dropping connection");
                return ConnectionOutcome::ReadFailed;
            }
            // il peer non ha chiuso: si prova comunque con quello che è arrivato
            Err(_) => debug!(bytes = buf.len(), "read timed out"),
        }

        if buf.is_empty() {
            debug!("peer closed without sending data");
            return ConnectionOutcome::Empty;
        }
        if buf.len() > self.max_frame {
            warn!(limit = self.max_frame, "payload too large, dropping connection");
            return ConnectionOutcome::Malformed;
        }

        let envelope = match decode(&buf) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, bytes = buf.len(), "malformed envelope, dropping connection");
                return ConnectionOutcome::Malformed;
            }
        };

        let record = envelope.stamp(now_timestamp(self.clock));
        match self.store.insert(&record).await {
            Ok(()) => {
                info!(username = %record.username, date = %record.date, "saved message");
                ConnectionOutcome::Stored
            }
            Err(e) => {
                error!(error = ?e, username = %record.username, "store insert failed, message dropped");
                ConnectionOutcome::StoreFailed
            }
        }
    }
}
