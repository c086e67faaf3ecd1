//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated config into a ready server
//! - Start the optional metrics endpoint
//! - Bind the listener last, so traffic only arrives when ready
//!
//! Any startup error is fatal: an unusable canonical URL never reaches
//! request processing.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::GoImportConfig;
use crate::goimport::UrlError;
use crate::http::HttpServer;

/// Error preventing the service from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid canonical web URL: {0}")]
    CanonicalUrl(#[from] UrlError),

    #[error("invalid upstream address: {0}")]
    Upstream(#[from] axum::http::uri::InvalidUri),

    #[error("invalid metrics address: {0}")]
    MetricsAddress(#[from] std::net::AddrParseError),

    #[error("metrics exporter failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("cannot bind listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// Build the server and bind its listener.
pub async fn start(config: &GoImportConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    let server = HttpServer::new(config)?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        crate::observability::metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    Ok((server, listener))
}
