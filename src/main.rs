//! Edge proxy server.
//!
//! ```text
//!     Browser                         ┌──────────────────────────────┐
//!     ───────── /api/proxy/* ───────▶ │ request id → trace → limits  │
//!                                     │   → EdgeProxy ──────────────┼──▶ Upstream
//!     ◀──────── status + CORS ─────── │   ◀─ relay + CORS ◀─────────┼─── (BACKEND_URL)
//!                                     │                              │
//!     ───────── /api/metrics ───────▶ │ telemetry sink (204/400/405) │
//!                                     └──────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use edge_proxy::config::load_config;
use edge_proxy::lifecycle::startup;
use edge_proxy::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "edge-proxy")]
#[command(about = "CORS-aware edge proxy and web-vitals sink", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        mount_path = %config.proxy.mount_path,
        telemetry_path = %config.telemetry.path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
