//! Metrics collection and exposition.
//!
//! # Metrics
//! - `goimport_requests_total` (counter): go-get answers by outcome
//!   (`found`, `not_found`, `error`)
//! - `goimport_lookups_total` (counter): collaborator lookups by kind
//!   (`exists`, `anonymous_read`)
//! - `goimport_passthrough_total` (counter): requests handed to the pipeline
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(outcome: &'static str) {
    metrics::counter!("goimport_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_lookup(kind: &'static str) {
    metrics::counter!("goimport_lookups_total", "kind" => kind).increment(1);
}

pub fn record_passthrough() {
    metrics::counter!("goimport_passthrough_total").increment(1);
}
