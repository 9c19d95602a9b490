pub mod envelope;
pub mod message;

// Re-export per comodità
pub use envelope::Envelope;
pub use message::StoredMessage;
