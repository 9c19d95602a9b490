use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use bacheca_core::{decode, Envelope};
use bacheca_server::{router, AppState, Pages, RelayClient, RelayError};
use http_body_util::BodyExt;
use std::{fs, net::SocketAddr, sync::Arc, time::Duration};
use tempfile::TempDir;
use tokio::{
    io::AsyncReadExt,
    net::TcpListener,
    sync::mpsc::{unbounded_channel, UnboundedReceiver},
};
use tower::ServiceExt;

// Crea templates/ e static/ in una directory temporanea
fn site(with_error_page: bool) -> Result<(TempDir, Pages)> {
    let td = TempDir::new()?;
    let templates = td.path().join("templates");
    let assets = td.path().join("static");
    fs::create_dir_all(&templates)?;
    fs::create_dir_all(&assets)?;
    fs::write(templates.join("index.html"), "<h1>index</h1>")?;
    fs::write(templates.join("message.html"), "<form>message</form>")?;
    if with_error_page {
        fs::write(templates.join("error.html"), "<h1>shared error view</h1>")?;
    }
    fs::write(assets.join("style.css"), "body { color: black; }")?;
    Ok((td, Pages::new(templates, assets)))
}

/// Finto worker: accetta connessioni e inoltra i byte ricevuti sul canale.
async fn capture_worker() -> Result<(SocketAddr, UnboundedReceiver<Vec<u8>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = unbounded_channel();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = Vec::new();
            let _ = stream.read_to_end(&mut buf).await;
            let _ = tx.send(buf);
        }
    });
    Ok((addr, rx))
}

// Un indirizzo su cui non ascolta nessuno
async fn dead_addr() -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

fn app(relay_addr: SocketAddr, pages: Pages) -> axum::Router {
    let relay = RelayClient::new(relay_addr.to_string()).with_timeout(Duration::from_secs(2));
    router(Arc::new(AppState { relay, pages }))
}

async fn call(app: axum::Router, method: &str, uri: &str, body: &str) -> Result<Response> {
    call_bytes(app, method, uri, body.as_bytes().to_vec()).await
}

async fn call_bytes(app: axum::Router, method: &str, uri: &str, body: Vec<u8>) -> Result<Response> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))?;
    Ok(app.oneshot(req).await?)
}

async fn body_text(resp: Response) -> Result<String> {
    let bytes = resp.into_body().collect().await?.to_bytes();
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn location(resp: &Response) -> Option<&str> {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn pages_are_served_from_templates() -> Result<()> {
    let (_td, pages) = site(true)?;
    let (addr, _rx) = capture_worker().await?;
    let app = app(addr, pages);

    for (uri, expected) in [
        ("/", "<h1>index</h1>"),
        ("/index.html", "<h1>index</h1>"),
        ("/message", "<form>message</form>"),
        ("/message.html", "<form>message</form>"),
    ] {
        let resp = call(app.clone(), "GET", uri, "").await?;
        assert_eq!(resp.status(), StatusCode::OK, "GET {}", uri);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(body_text(resp).await?, expected);
    }
    Ok(())
}

#[tokio::test]
async fn static_assets_get_their_content_type() -> Result<()> {
    let (_td, pages) = site(true)?;
    let (addr, _rx) = capture_worker().await?;

    let resp = call(app(addr, pages.clone()), "GET", "/style.css", "").await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/css");
    assert_eq!(body_text(resp).await?, "body { color: black; }");

    // logo.png non esiste nella directory di test
    let resp = call(app(addr, pages), "GET", "/logo.png", "").await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn unknown_paths_and_methods_are_404() -> Result<()> {
    let (_td, pages) = site(true)?;
    let (addr, _rx) = capture_worker().await?;
    let app = app(addr, pages);

    for (method, uri) in [
        ("GET", "/nope"),
        ("GET", "/templates/index.html"),
        ("POST", "/"),
        ("POST", "/index.html"),
        ("DELETE", "/message"),
        ("PUT", "/style.css"),
        ("HEAD", "/"),
        ("HEAD", "/index.html"),
        ("HEAD", "/message"),
        ("HEAD", "/message.html"),
        ("HEAD", "/style.css"),
        ("HEAD", "/logo.png"),
        ("HEAD", "/nope"),
    ] {
        let resp = call(app.clone(), method, uri, "").await?;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);
        if method != "HEAD" {
            assert_eq!(body_text(resp).await?, "<h1>shared error view</h1>");
        }
    }
    Ok(())
}

#[tokio::test]
async fn error_view_falls_back_to_inline_html() -> Result<()> {
    let (_td, pages) = site(false)?;
    let resp = call(app(dead_addr().await?, pages.clone()), "GET", "/nope", "").await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await?, "<h1>404 Not Found</h1>");

    let resp = call(app(dead_addr().await?, pages), "POST", "/message", "username=a&message=b").await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await?, "<h1>500 Internal Server Error</h1>");
    Ok(())
}

/*
    Obiettivo test: un POST valido produce un redirect 302 verso /index.html
    e sul socket interno arriva esattamente l'envelope, senza data.
*/
#[tokio::test]
async fn valid_submission_is_relayed_and_redirected() -> Result<()> {
    let (_td, pages) = site(true)?;
    let (addr, mut rx) = capture_worker().await?;
    let app = app(addr, pages);

    for uri in ["/message", "/message.html"] {
        let resp = call(app.clone(), "POST", uri, "username=alice&message=ciao+a+tutti%21").await?;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), Some("/index.html"));

        let bytes = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await?.expect("payload");
        let json: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert!(json.get("date").is_none());
        assert_eq!(decode(&bytes)?, Envelope::new("alice", "ciao a tutti!")?);
    }
    Ok(())
}

#[tokio::test]
async fn incomplete_submission_skips_relay_but_still_redirects() -> Result<()> {
    let (_td, pages) = site(true)?;
    let (addr, mut rx) = capture_worker().await?;
    let app = app(addr, pages);

    for body in ["username=&message=hi", "username=alice&message=", "message=hi", "username=alice", ""] {
        let resp = call(app.clone(), "POST", "/message", body).await?;
        assert_eq!(resp.status(), StatusCode::FOUND, "body {:?}", body);
        assert_eq!(location(&resp), Some("/index.html"));
    }

    // nessuna connessione deve essere arrivata al worker
    assert!(tokio::time::timeout(Duration::from_millis(300), rx.recv()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn unreachable_worker_is_a_500() -> Result<()> {
    let (_td, pages) = site(true)?;
    let resp = call(app(dead_addr().await?, pages), "POST", "/message", "username=alice&message=hi").await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await?, "<h1>shared error view</h1>");
    Ok(())
}

// chiavi ripetute: si invia il primo valore e si risponde con il redirect
#[tokio::test]
async fn repeated_keys_relay_the_first_value() -> Result<()> {
    let (_td, pages) = site(true)?;
    let (addr, mut rx) = capture_worker().await?;

    let resp = call(app(addr, pages), "POST", "/message", "username=a&username=b&message=m").await?;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), Some("/index.html"));

    let bytes = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await?.expect("payload");
    assert_eq!(decode(&bytes)?, Envelope::new("a", "m")?);
    Ok(())
}

// byte non UTF-8 nel body: errore di parsing, 500 e nessun invio
#[tokio::test]
async fn non_utf8_body_is_a_500() -> Result<()> {
    let (_td, pages) = site(true)?;
    let (addr, mut rx) = capture_worker().await?;

    let mut body = b"username=".to_vec();
    body.extend_from_slice(&[0xff, 0xfe]);
    body.extend_from_slice(b"&message=m");
    let resp = call_bytes(app(addr, pages), "POST", "/message", body).await?;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await?, "<h1>shared error view</h1>");
    assert!(tokio::time::timeout(Duration::from_millis(300), rx.recv()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn relay_client_reports_transport_errors() -> Result<()> {
    let envelope = Envelope::new("alice", "hi")?;

    let err = RelayClient::new(dead_addr().await?.to_string()).send(&envelope).await.unwrap_err();
    assert!(matches!(err, RelayError::Connect { .. }), "{:?}", err);

    let big = Envelope::new("alice", "x".repeat(bacheca_core::MAX_FRAME))?;
    let (addr, mut rx) = capture_worker().await?;
    let err = RelayClient::new(addr.to_string()).send(&big).await.unwrap_err();
    assert!(matches!(err, RelayError::Encode(_)), "{:?}", err);
    // nessuna connessione per un payload che il worker scarterebbe
    assert!(tokio::time::timeout(Duration::from_millis(300), rx.recv()).await.is_err());
    Ok(())
}
