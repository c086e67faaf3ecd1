//! Longest-prefix repository name resolution.
//!
//! Repository names have arbitrary depth and may nest (`a` and `a/b` can both
//! exist), so a request path is matched against its prefixes from the most
//! specific down to a single segment. The first prefix that exists wins.
//!
//! ```text
//! existing: a, a/b
//!   /a        → a
//!   /a/b      → a/b
//!   /a/c      → a
//!   /a/b/c/d  → a/b
//!   /x/y/z    → none
//! ```

use std::sync::Arc;

use crate::registry::{LookupError, ProjectLookup};

/// First path segment routing requests through the authenticated channel.
pub const AUTH_MARKER: &str = "a";

/// Outcome of resolving one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Whether the path began with the authentication marker.
    pub authenticated: bool,
    /// Longest existing repository name, if any.
    pub repository: Option<String>,
}

/// Split off the authentication marker and the leading slash.
///
/// The marker only counts when another segment follows it, so `/a` on its
/// own names a repository called `a`.
pub fn strip_auth_marker(path: &str) -> (bool, &str) {
    let rest = path.strip_prefix('/').unwrap_or(path);
    match rest
        .strip_prefix(AUTH_MARKER)
        .and_then(|r| r.strip_prefix('/'))
    {
        Some(candidate) => (true, candidate),
        None => (false, rest),
    }
}

/// Segments of a candidate name with trailing empty segments removed.
fn segments(candidate: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = candidate.split('/').collect();
    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

/// Resolves request paths to repository names.
#[derive(Clone)]
pub struct NameResolver {
    projects: Arc<dyn ProjectLookup>,
}

impl NameResolver {
    pub fn new(projects: Arc<dyn ProjectLookup>) -> Self {
        Self { projects }
    }

    /// Resolve `path` (the URL path, starting with `/`).
    ///
    /// Issues one existence lookup per candidate length tried. A failed lookup
    /// aborts resolution.
    ///
    /// A marker-prefixed path that matches nothing once stripped is retried
    /// verbatim, so a repository literally named `a` (or nested under `a/`)
    /// stays reachable over the plain channel. Such paths can therefore cost
    /// up to twice as many lookups as they have segments.
    pub async fn resolve(&self, path: &str) -> Result<Resolution, LookupError> {
        let (authenticated, candidate) = strip_auth_marker(path);
        if let Some(name) = self.longest_match(candidate).await? {
            return Ok(Resolution {
                authenticated,
                repository: Some(name),
            });
        }

        if authenticated {
            let literal = path.strip_prefix('/').unwrap_or(path);
            if let Some(name) = self.longest_match(literal).await? {
                tracing::debug!(
                    path = %path,
                    repository = %name,
                    "Marker segment matched a literal repository name"
                );
                return Ok(Resolution {
                    authenticated: false,
                    repository: Some(name),
                });
            }
        }

        Ok(Resolution {
            authenticated,
            repository: None,
        })
    }

    async fn longest_match(&self, candidate: &str) -> Result<Option<String>, LookupError> {
        let parts = segments(candidate);
        for len in (1..=parts.len()).rev() {
            let name = parts[..len].join("/");
            crate::observability::metrics::record_lookup("exists");
            if self.projects.exists(&name).await? {
                return Ok(Some(name));
            }
        }
        Ok(None)
    }
}
