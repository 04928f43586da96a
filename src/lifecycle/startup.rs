//! Startup orchestration.
//!
//! # Responsibilities
//! - Start background tasks (metrics exporter, signal listener)
//! - Build the server from a validated configuration
//! - Bind the listener (plain or TLS) and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A missing upstream URL is logged, not fatal; preflight keeps working

use std::net::{AddrParseError, SocketAddr};
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::tls::load_tls_config;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid address: {0}")]
    Address(#[from] AddrParseError),

    #[error("Failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

/// Serve `config` until SIGINT/SIGTERM.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    match config.proxy.upstream_base() {
        Some(upstream) => tracing::info!(
            mount_path = %config.proxy.mount_path,
            upstream = %upstream,
            "Upstream configured"
        ),
        None => tracing::warn!(
            env = %config.proxy.upstream_env,
            "No upstream configured, forwarded requests will answer 500"
        ),
    }

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse::<SocketAddr>()?)?;
    }

    let addr: SocketAddr = config.listener.bind_address.parse()?;
    let tls = config.listener.tls.clone();
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    match tls {
        Some(tls) => {
            let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
            server.run_tls(addr, rustls, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(addr).await?;
            server.run(listener, server_shutdown).await?;
        }
    }

    Ok(())
}
