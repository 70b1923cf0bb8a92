//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging and metrics from the validated config
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, traffic only arrives once everything is ready

use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::{self, metrics};

/// Error type for startup failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("failed to start metrics endpoint: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the gateway with the given configuration until shutdown.
pub async fn start(config: GatewayConfig) -> Result<(), StartupError> {
    observability::init_logging(&config.observability)?;

    tracing::info!("site-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        namespace = %config.gateway.namespace,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        max_response_body_bytes = config.limits.max_response_body_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let server = HttpServer::new(config.clone())?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    // Only OS signals stop a standalone process.
    let shutdown = Shutdown::new();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
