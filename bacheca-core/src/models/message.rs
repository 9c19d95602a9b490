use serde::{Deserialize, Serialize};

/// Messaggio persistito dal worker: l'envelope più la data di ricezione.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub username: String,
    pub message: String,
    pub date: String, // "YYYY-MM-DD HH:MM:SS.ffffff", ora locale del worker
}
