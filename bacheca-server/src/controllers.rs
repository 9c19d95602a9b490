use anyhow::Context;
use axum::{
    body::Bytes,
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bacheca_core::MessageForm;
use std::sync::Arc;

use crate::AppState;

/// Handler per GET / e /index.html
pub async fn index(Extension(state): Extension<Arc<AppState>>) -> Response {
    state.pages.render("index.html").await
}

/// Handler per GET /message e /message.html
pub async fn message_page(Extension(state): Extension<Arc<AppState>>) -> Response {
    state.pages.render("message.html").await
}

/// Handler per POST /message e /message.html
///
/// Se manca uno dei due campi non si invia nulla ma si fa comunque il redirect:
/// l'utente non sa mai se il messaggio è stato salvato.
pub async fn submit_message(Extension(state): Extension<Arc<AppState>>, body: Bytes) -> Response {
    let form = match decode_form(&body) {
        Ok(form) => form,
        Err(e) => {
            tracing::error!(error = ?e, "error handling POST");
            return state.pages.error(StatusCode::INTERNAL_SERVER_ERROR).await;
        }
    };

    match form.into_envelope() {
        Some(envelope) => {
            if let Err(e) = state.relay.send(&envelope).await {
                tracing::error!(error = %e, relay = state.relay.addr(), "error relaying message");
                return state.pages.error(StatusCode::INTERNAL_SERVER_ERROR).await;
            }
            tracing::info!(username = envelope.username(), "message relayed");
        }
        None => tracing::debug!("incomplete form, nothing to relay"),
    }

    (StatusCode::FOUND, [(header::LOCATION, "/index.html")]).into_response()
}

/// Il body deve essere UTF-8 valido: niente decodifica "lossy" di byte grezzi.
/// Solo username e message, il resto del form viene ignorato.
fn decode_form(body: &[u8]) -> anyhow::Result<MessageForm> {
    let text = std::str::from_utf8(body).context("form body is not valid UTF-8")?;
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(text).context("decode form body")?;
    Ok(MessageForm::from_pairs(pairs))
}

/// Handler per GET /style.css
pub async fn style(Extension(state): Extension<Arc<AppState>>) -> Response {
    state.pages.serve_asset("style.css").await
}

/// Handler per GET /logo.png
pub async fn logo(Extension(state): Extension<Arc<AppState>>) -> Response {
    state.pages.serve_asset("logo.png").await
}

/// Qualsiasi altro percorso o metodo
pub async fn not_found(Extension(state): Extension<Arc<AppState>>) -> Response {
    state.pages.error(StatusCode::NOT_FOUND).await
}
