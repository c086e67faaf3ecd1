//! Config-backed repository registry.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use crate::config::RepositoryConfig;
use crate::registry::lookup::{AccessPolicy, LookupError, ProjectLookup};

/// Strip leading and trailing slashes from a configured repository name.
pub fn normalize_name(name: &str) -> &str {
    name.trim_matches('/')
}

/// In-memory registry of repositories, swapped wholesale on reload.
///
/// Maps repository name to its anonymous read flag. Every lookup reads a
/// single snapshot, so a concurrent reload never yields a mixed view.
pub struct RepositoryRegistry {
    repos: ArcSwap<HashMap<String, bool>>,
}

impl RepositoryRegistry {
    pub fn from_config(repos: &[RepositoryConfig]) -> Self {
        Self {
            repos: ArcSwap::from_pointee(build_map(repos)),
        }
    }

    /// Replace the registry contents.
    pub fn reload(&self, repos: &[RepositoryConfig]) {
        let map = build_map(repos);
        tracing::info!(repositories = map.len(), "Repository registry reloaded");
        self.repos.store(Arc::new(map));
    }

    pub fn len(&self) -> usize {
        self.repos.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_map(repos: &[RepositoryConfig]) -> HashMap<String, bool> {
    repos
        .iter()
        .map(|r| (normalize_name(&r.name).to_string(), r.anonymous_read))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

#[async_trait]
impl ProjectLookup for RepositoryRegistry {
    async fn exists(&self, name: &str) -> Result<bool, LookupError> {
        Ok(self.repos.load().contains_key(name))
    }
}

#[async_trait]
impl AccessPolicy for RepositoryRegistry {
    async fn can_anonymous_read(&self, repository: &str) -> Result<bool, LookupError> {
        // Unknown repositories are never anonymously readable.
        Ok(self.repos.load().get(repository).copied().unwrap_or(false))
    }
}
