//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router: go-get middleware in front of the pipeline
//! - Wire up middleware (tracing, timeout, request ID)
//! - Apply reloaded repository lists to the registry
//! - Serve until a shutdown signal or trigger

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GoImportConfig;
use crate::goimport::{go_import_middleware, CanonicalUrl, GoImport};
use crate::http::upstream::{forward_handler, not_found_handler, Upstream};
use crate::lifecycle::{shutdown_signal, StartupError};
use crate::registry::RepositoryRegistry;

/// Build the router: go-get interception in front of `upstream` (or a 404
/// fallback when there is none).
#[allow(deprecated)]
pub fn build_router(
    go_import: Arc<GoImport>,
    upstream: Option<Upstream>,
    request_timeout: Duration,
) -> Router {
    let pipeline = match upstream {
        Some(upstream) => Router::new()
            .fallback(forward_handler)
            .with_state(Arc::new(upstream)),
        None => Router::new().fallback(not_found_handler),
    };

    pipeline.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(request_timeout))
            .layer(middleware::from_fn_with_state(go_import, go_import_middleware)),
    )
}

/// Apply a reloaded config. Only the repository list is live; the canonical
/// URL is fixed at startup.
pub fn apply_config_update(
    registry: &RepositoryRegistry,
    canonical_url: &CanonicalUrl,
    config: &GoImportConfig,
) {
    let changed = CanonicalUrl::parse(&config.server.canonical_web_url)
        .map(|url| url != *canonical_url)
        .unwrap_or(true);
    if changed {
        tracing::warn!(
            configured = %config.server.canonical_web_url,
            active = %canonical_url.web_url(),
            "canonical_web_url changed; restart to apply"
        );
    }
    registry.reload(&config.repositories);
}

/// HTTP server for the go-import service.
pub struct HttpServer {
    router: Router,
    registry: Arc<RepositoryRegistry>,
    canonical_url: CanonicalUrl,
}

impl HttpServer {
    /// Create a server backed by the config's repository registry.
    ///
    /// Fails if the canonical URL or the upstream address is unusable.
    pub fn new(config: &GoImportConfig) -> Result<Self, StartupError> {
        let canonical_url = CanonicalUrl::parse(&config.server.canonical_web_url)?;
        let registry = Arc::new(RepositoryRegistry::from_config(&config.repositories));
        let upstream = config
            .upstream
            .as_ref()
            .map(|u| Upstream::new(&u.address))
            .transpose()?;

        tracing::info!(
            web_url = %canonical_url.web_url(),
            project_prefix = %canonical_url.project_prefix(),
            repositories = registry.len(),
            upstream = ?upstream.as_ref().map(|u| u.authority().to_string()),
            "go-import configured"
        );

        let go_import = Arc::new(GoImport::new(
            canonical_url.clone(),
            registry.clone(),
            registry.clone(),
        ));
        let router = build_router(
            go_import,
            upstream,
            Duration::from_secs(config.timeouts.request_secs),
        );

        Ok(Self {
            router,
            registry,
            canonical_url,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn registry(&self) -> &Arc<RepositoryRegistry> {
        &self.registry
    }

    pub fn canonical_url(&self) -> &CanonicalUrl {
        &self.canonical_url
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Stops on SIGINT/SIGTERM or when `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GoImportConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let registry = self.registry.clone();
        let canonical_url = self.canonical_url.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                apply_config_update(&registry, &canonical_url, &config);
            }
        });

        let stop = async move {
            tokio::select! {
                _ = shutdown_signal() => {},
                _ = shutdown.recv() => tracing::info!("Shutdown triggered"),
            }
        };

        axum::serve(listener, self.router)
            .with_graceful_shutdown(stop)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
