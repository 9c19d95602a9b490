pub mod form;
pub mod wire;

// Re-export comodi
pub use form::MessageForm;
pub use wire::{decode, encode, MAX_FRAME};
