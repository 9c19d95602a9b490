use thiserror::Error;

/// Errori di codifica/decodifica del payload scambiato sul socket interno.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("payload of {size} bytes exceeds the {limit} bytes limit")]
    Oversized { size: usize, limit: usize },

    #[error("malformed envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field `{0}` is empty")]
    EmptyField(&'static str),
}
