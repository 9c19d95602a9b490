/* Formato dei byte che "viaggiano" sul socket tra relay client e worker.
    Un envelope per connessione, JSON UTF-8, nessuna risposta.
    Esempio: {"username":"alice","message":"ciao"}
*/
use crate::{error::WireError, models::Envelope};

/// Dimensione massima di un payload accettato dal worker.
pub const MAX_FRAME: usize = 4096;

/// Serializza un envelope nei byte da scrivere sul socket.
pub fn encode(envelope: &Envelope) -> Result<Vec<u8>, WireError> {
    let bytes = serde_json::to_vec(envelope)?;
    if bytes.len() > MAX_FRAME {
        return Err(WireError::Oversized { size: bytes.len(), limit: MAX_FRAME });
    }
    Ok(bytes)
}

/// Decodifica i byte letti dal socket. Campi sconosciuti (compreso un
/// eventuale `date` mandato dal client) vengono ignorati.
pub fn decode(bytes: &[u8]) -> Result<Envelope, WireError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    envelope.validate()?;
    Ok(envelope)
}
