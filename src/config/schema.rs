//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the go-import service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GoImportConfig {
    /// Canonical identity of the hosting server.
    pub server: ServerConfig,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Hosting server that receives all non go-get traffic.
    pub upstream: Option<UpstreamConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Known repositories and their anonymous read policy.
    pub repositories: Vec<RepositoryConfig>,
}

/// Canonical server identity.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Public-facing URL of the hosting server (e.g., "https://example.com/").
    pub canonical_web_url: String,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream hosting server.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:8081").
    pub address: String,
}

/// A repository known to the built-in registry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RepositoryConfig {
    /// Slash-delimited repository name (e.g., "tools/build").
    pub name: String,

    /// Whether anonymous users may read `refs/heads/*`.
    #[serde(default)]
    pub anonymous_read: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
