use serde::Deserialize;

use crate::models::Envelope;

/// Body urlencoded di POST /message. Gli altri campi del form vengono ignorati.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageForm {
    /// Costruisce il form dalle coppie chiave/valore già decodificate.
    /// Per le chiavi ripetute vale la prima occorrenza non vuota.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "username" => &mut form.username,
                "message" => &mut form.message,
                _ => continue,
            };
            // i valori vuoti non contano, come se la chiave non ci fosse
            let value = value.into();
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value);
            }
        }
        form
    }

    /// `None` se manca uno dei due campi o è vuoto: in quel caso non si invia nulla.
    pub fn into_envelope(self) -> Option<Envelope> {
        match (self.username, self.message) {
            (Some(username), Some(message)) => Envelope::new(username, message).ok(),
            _ => None,
        }
    }
}
