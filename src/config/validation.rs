//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Canonical web URL must parse and carry a host
//! - Repository names must be non-empty and unique after normalization
//! - Addresses must parse, timeouts must be positive
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GoImportConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::GoImportConfig;
use crate::goimport::CanonicalUrl;
use crate::registry::normalize_name;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("server.canonical_web_url is not set")]
    MissingCanonicalUrl,

    #[error("server.canonical_web_url is invalid: {0}")]
    InvalidCanonicalUrl(String),

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("repository #{index} has an empty name")]
    EmptyRepositoryName { index: usize },

    #[error("repository {0} is defined more than once")]
    DuplicateRepository(String),
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &GoImportConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let url = config.server.canonical_web_url.trim();
    if url.is_empty() {
        errors.push(ValidationError::MissingCanonicalUrl);
    } else if let Err(e) = CanonicalUrl::parse(url) {
        errors.push(ValidationError::InvalidCanonicalUrl(e.to_string()));
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if let Some(upstream) = &config.upstream {
        check_address(&mut errors, "upstream.address", &upstream.address);
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut seen = HashSet::new();
    for (index, repo) in config.repositories.iter().enumerate() {
        let name = normalize_name(&repo.name);
        if name.is_empty() {
            errors.push(ValidationError::EmptyRepositoryName { index });
        } else if !seen.insert(name) {
            errors.push(ValidationError::DuplicateRepository(name.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
