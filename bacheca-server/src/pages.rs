use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::{
    io,
    path::{Path, PathBuf},
};

const HTML: &str = "text/html; charset=utf-8";

/// Pagine HTML e asset statici letti da disco, per nome.
#[derive(Debug, Clone)]
pub struct Pages {
    templates: PathBuf,
    assets: PathBuf,
}

impl Pages {
    pub fn new(templates: impl Into<PathBuf>, assets: impl Into<PathBuf>) -> Self {
        Self { templates: templates.into(), assets: assets.into() }
    }

    /// `Ok(None)` se il template non esiste.
    pub async fn template(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        read_optional(&self.templates.join(name)).await
    }

    pub async fn asset(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        read_optional(&self.assets.join(name)).await
    }

    /// Risposta 200 con il template richiesto, 404 se manca, 500 se non si riesce a leggerlo.
    pub async fn render(&self, name: &str) -> Response {
        match self.template(name).await {
            Ok(Some(body)) => (StatusCode::OK, [(header::CONTENT_TYPE, HTML)], body).into_response(),
            Ok(None) => self.error(StatusCode::NOT_FOUND).await,
            Err(e) => {
                tracing::error!(error = %e, template = name, "error serving HTML");
                self.error(StatusCode::INTERNAL_SERVER_ERROR).await
            }
        }
    }

    /// Come [`Pages::render`], con il content type ricavato dall'estensione.
    pub async fn serve_asset(&self, name: &str) -> Response {
        match self.asset(name).await {
            Ok(Some(body)) => {
                let mime = mime_guess::from_path(name).first_or_octet_stream();
                (StatusCode::OK, [(header::CONTENT_TYPE, mime.to_string())], body).into_response()
            }
            Ok(None) => self.error(StatusCode::NOT_FOUND).await,
            Err(e) => {
                tracing::error!(error = %e, asset = name, "error serving static");
                self.error(StatusCode::INTERNAL_SERVER_ERROR).await
            }
        }
    }

    /// Pagina di errore condivisa (error.html) oppure un fallback inline.
    pub async fn error(&self, status: StatusCode) -> Response {
        let body = match self.template("error.html").await {
            Ok(Some(body)) => body,
            _ => fallback(status).into_bytes(),
        };
        (status, [(header::CONTENT_TYPE, HTML)], body).into_response()
    }
}

fn fallback(status: StatusCode) -> String {
    format!(
        "<h1>{} {}</h1>",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    )
}

async fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
