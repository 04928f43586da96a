use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use url::Url;

use edge_proxy::config::load_config;
use edge_proxy::proxy::{EdgeProxy, FunctionEvent};
use edge_proxy::telemetry::{Beacon, WebVital};

#[derive(Parser)]
#[command(name = "edge-proxy-cli")]
#[command(about = "Run function events through the edge proxy and report web vitals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one serverless function event and print the function response
    Invoke {
        /// Event JSON file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        event: PathBuf,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Send one web-vitals measurement to a running sink
    Vital {
        #[arg(short, long, default_value = "http://localhost:8080/api/metrics")]
        url: Url,

        /// Metric name (CLS, LCP, INP, FCP, TTFB, ...)
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        value: f64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Invoke { event, config } => {
            let config = load_config(config.as_deref())?;
            let proxy = EdgeProxy::new(&config)?;
            let event: FunctionEvent = serde_json::from_str(&read_event(&event)?)?;

            let response = proxy.handle_event(event).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Vital { url, name, value } => {
            let beacon = Beacon::new(url)?;
            let vital = WebVital {
                name,
                value,
                id: None,
                delta: None,
                rating: None,
                navigation_type: None,
            };
            // The process would exit before the background send otherwise.
            if let Some(delivery) = beacon.report(&vital) {
                delivery.await?;
            }
            eprintln!("Reported {} to {}", vital.name, beacon.endpoint());
        }
    }

    Ok(())
}

fn read_event(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}
