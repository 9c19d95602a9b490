use serde::{Deserialize, Serialize};

use crate::{error::WireError, models::StoredMessage};

/// Envelope inviato dall'intake service al worker: solo `username` e `message`.
///
/// I campi sono privati: una volta costruito l'envelope non cambia più,
/// l'unico modo per aggiungere la data è [`Envelope::stamp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    username: String,
    message: String,
}

impl Envelope {
    /// Costruisce un envelope, rifiutando campi vuoti.
    pub fn new(username: impl Into<String>, message: impl Into<String>) -> Result<Self, WireError> {
        let envelope = Self { username: username.into(), message: message.into() };
        envelope.validate()?;
        Ok(envelope)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Usato anche dal decoder: serde non sa nulla della regola "non vuoto".
    pub(crate) fn validate(&self) -> Result<(), WireError> {
        if self.username.is_empty() {
            return Err(WireError::EmptyField("username"));
        }
        if self.message.is_empty() {
            return Err(WireError::EmptyField("message"));
        }
        Ok(())
    }

    /// Consuma l'envelope e produce il record da persistere con la data di ricezione.
    pub fn stamp(self, date: String) -> StoredMessage {
        StoredMessage { username: self.username, message: self.message, date }
    }
}
