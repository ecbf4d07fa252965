//! kuwo-proxy
//!
//! An edge reverse proxy in front of the kuwo audio CDN and a replacement
//! music API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request ID, trace span)
//!                         │
//!                         ▼
//!                     routing::classify
//!           ┌─────────────┼──────────────┬──────────────┐
//!           ▼             ▼              ▼              ▼
//!     OPTIONS → 204   other → 405   ?target=…        no target
//!                                        │              │
//!                                        ▼              ▼
//!                               forward::audio    forward::api
//!                               (kuwo.cn, http)   (API_BASE, https)
//!                                        │              │
//!                                        └──────┬───────┘
//!                                               ▼
//!     Client Response ◀──────── security::headers::sanitize + streamed body
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use kuwo_proxy::config::{load_config, validation::validate_config, ConfigError, ProxyConfig};
use kuwo_proxy::lifecycle::{wait_for_signal, Shutdown};
use kuwo_proxy::observability::init_logging;
use kuwo_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "kuwo-proxy")]
#[command(about = "Edge proxy for kuwo audio files and the music API", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overriding the configuration file.
    #[arg(short, long)]
    bind: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<ProxyConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
        validate_config(&config).map_err(ConfigError::Validation)?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(&config.observability);

    tracing::info!("kuwo-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        connect_timeout_secs = config.timeouts.connect_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on(wait_for_signal());

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
