//! Path-rewriting forwarder (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                  FORWARDER                   │
//!                        │                                              │
//!     Client Request     │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!     ───────────────────┼─▶│  http   │───▶│ routing  │───▶│ client  │──┼──▶ Upstream
//!                        │  │ server  │    │ rewrite  │    │(reqwest)│  │
//!                        │  └─────────┘    └──────────┘    └────┬────┘  │
//!                        │                                      │       │
//!     Client Response    │  ┌──────────┐                        │       │
//!     ◀──────────────────┼──│ response │◀───────────────────────┘       │
//!                        │  │  relay   │                                │
//!                        │  └──────────┘                                │
//!                        │                                              │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_forwarder::config::{
    read_config, resolve_config, ConfigError, ConfigOverrides, ProxyConfig,
};
use api_forwarder::observability::init_logging;
use api_forwarder::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "api-forwarder")]
#[command(about = "Forward requests under a path prefix to a fixed upstream", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address, overrides listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Path prefix to strip, overrides forwarding.prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Upstream base URL, overrides forwarding.upstream_base
    #[arg(long)]
    upstream: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bind_address: self.bind.clone(),
            prefix: self.prefix.clone(),
            upstream_base: self.upstream.clone(),
        }
    }

    /// File values are read unvalidated; flags go on top, then one validation pass.
    fn resolve_config(&self) -> Result<ProxyConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => read_config(path)?,
            None => ProxyConfig::default(),
        };
        resolve_config(base, &self.overrides())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_logging(&config.observability)?;

    tracing::info!("api-forwarder v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        prefix = %config.forwarding.prefix,
        upstream = %config.forwarding.upstream_base,
        response_timeout_secs = config.timeouts.response_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
