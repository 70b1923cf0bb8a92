//! Site gateway.
//!
//! A forwarding HTTP gateway built with Tokio and Axum. Any absolute URL can
//! be browsed through `/sites/{percent-encoded URL}`; HTML responses are
//! rewritten so every link, form and asset keeps routing through the gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌────────────────────────────────────────────────────────┐
//!                   │                      SITE GATEWAY                       │
//!                   │                                                         │
//!  Client Request   │  ┌─────────┐    ┌──────────┐    ┌───────────┐          │
//!  ─────────────────┼─▶│  http   │───▶│ routing  │───▶│ forwarder │──────────┼──▶ Origin
//!                   │  │ server  │    │  codec   │    │ (reqwest) │          │
//!                   │  └─────────┘    └──────────┘    └─────┬─────┘          │
//!                   │                                       │                 │
//!                   │            3xx ┌──────────┐           │ 2xx             │
//!                   │       ┌────────│ redirect │◀──────────┤                 │
//!                   │       │        └──────────┘           ▼                 │
//!  Client Response  │       ▼                       ┌──────────────┐          │
//!  ◀────────────────┼── response ◀──────────────────│ headers +    │◀─────────┼─── Origin
//!                   │                               │ html rewrite │          │
//!                   │                               └──────────────┘          │
//!                   │                                                         │
//!                   │   config · observability · lifecycle (cross-cutting)    │
//!                   └────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use site_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use site_gateway::lifecycle::startup;

#[derive(Parser)]
#[command(name = "site-gateway")]
#[command(about = "Browse any site through a single rewriting gateway origin", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override gateway.namespace.
    #[arg(short, long)]
    namespace: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(namespace) = self.namespace {
            config.gateway.namespace = namespace;
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    startup::start(config).await?;
    Ok(())
}
