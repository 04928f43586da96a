//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use edge_proxy::config::ProxyConfig;
use edge_proxy::http::HttpServer;
use edge_proxy::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A request as the mock upstream saw it.
#[derive(Debug)]
pub struct Captured {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Start an upstream that records every request and answers with
/// `status` and `body`.
pub async fn start_recording_backend(
    status: StatusCode,
    body: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<Captured>) {
    let (tx, rx) = mpsc::unbounded_channel();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let tx = tx.clone();
        async move {
            let (parts, body_stream) = request.into_parts();
            let received = axum::body::to_bytes(body_stream, usize::MAX)
                .await
                .unwrap_or_default();
            let _ = tx.send(Captured {
                method: parts.method,
                uri: parts.uri,
                headers: parts.headers,
                body: received,
            });
            (
                status,
                [
                    ("content-type", "application/json"),
                    ("x-upstream", "mock"),
                    ("access-control-allow-origin", "https://upstream.example"),
                ],
                body,
            )
                .into_response()
        }
    });

    (serve(app).await, rx)
}

/// Start an upstream that waits `delay` before answering 200.
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    let app = Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        (StatusCode::OK, "late")
    });
    serve(app).await
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Default config pointed at `upstream`, or with no upstream at all.
pub fn config_for(upstream: Option<SocketAddr>) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.proxy.upstream_url = upstream.map(|addr| format!("http://{addr}"));
    config.observability.metrics_enabled = false;
    config
}

/// Run the proxy on an ephemeral port. Keep the returned `Shutdown` alive
/// for as long as the server should run.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Test client that ignores proxy environment variables.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
