//! bacheca-core: tipi condivisi tra intake service e persistence worker
//! (envelope, record persistito, codec wire, form HTTP, formato data).
//! Niente I/O: rete e storage stanno nei crate server e worker.

pub mod error;
pub mod models;
pub mod protocol;
pub mod utils;

// Re-export utili per ridurre i percorsi nei crate server/worker
pub use error::WireError;
pub use models::{envelope::Envelope, message::StoredMessage};
pub use protocol::form::MessageForm;
pub use protocol::wire::{decode, encode, MAX_FRAME};
pub use utils::{now_timestamp, parse_timestamp, Clock, DATE_FORMAT};
