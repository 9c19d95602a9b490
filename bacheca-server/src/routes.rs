use axum::{
    handler::Handler,
    routing::{get, MethodRouter},
    Extension, Router,
};
use std::sync::Arc;

use crate::controllers;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", page(controllers::index))
        .route("/index.html", page(controllers::index))
        .route("/message", page(controllers::message_page).post(controllers::submit_message))
        .route("/message.html", page(controllers::message_page).post(controllers::submit_message))
        .route("/style.css", page(controllers::style))
        .route("/logo.png", page(controllers::logo))
        .fallback(controllers::not_found)
        .layer(Extension(state))
}

// Ogni metodo non previsto su un percorso noto risponde 404, come i percorsi sconosciuti.
// HEAD va dichiarato a parte: `get` lo servirebbe con 200.
fn page<H, T>(handler: H) -> MethodRouter
where
    H: Handler<T, ()>,
    T: 'static,
{
    get(handler)
        .head(controllers::not_found)
        .fallback(controllers::not_found)
}
