//! go-get discovery subsystem.
//!
//! # Data Flow
//! ```text
//! Request with ?go-get=1
//!     → middleware.rs (trigger check)
//!     → resolver.rs (strip /a marker, longest existing prefix)
//!     → page.rs (anonymous read policy → clone URL → HTML document)
//!     → 200 FOUND / 404 NOT FOUND
//!
//! Any other request
//!     → next handler, untouched
//! ```
//!
//! # Design Decisions
//! - No state across requests; only the startup-normalized URL is shared
//! - Collaborators are passed in explicitly, never looked up globally
//! - Lookups are not cached or retried; a failure aborts the request

pub mod canonical;
pub mod middleware;
pub mod page;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

pub use canonical::{CanonicalUrl, UrlError};
pub use middleware::{decode_path, go_import_middleware, is_go_get, GO_GET_PARAM};
pub use page::{GoImportPage, ResponseBuilder, PAGE_404};
pub use resolver::{strip_auth_marker, NameResolver, Resolution, AUTH_MARKER};

use crate::registry::{AccessPolicy, LookupError, ProjectLookup};

/// Answers go-get requests for one hosting server.
#[derive(Clone)]
pub struct GoImport {
    resolver: NameResolver,
    builder: ResponseBuilder,
}

impl GoImport {
    pub fn new(
        url: CanonicalUrl,
        projects: Arc<dyn ProjectLookup>,
        access: Arc<dyn AccessPolicy>,
    ) -> Self {
        Self {
            resolver: NameResolver::new(projects),
            builder: ResponseBuilder::new(url, access),
        }
    }

    pub fn canonical_url(&self) -> &CanonicalUrl {
        self.builder.canonical_url()
    }

    /// Resolve `path` and render the go-get answer for it.
    pub async fn handle(&self, path: &str) -> Result<GoImportPage, LookupError> {
        let resolution = self.resolver.resolve(path).await?;
        let page = self
            .builder
            .build(resolution.repository.as_deref(), resolution.authenticated)
            .await?;

        tracing::debug!(
            path = %path,
            repository = ?resolution.repository,
            authenticated = resolution.authenticated,
            status = %page.status,
            "Answered go-get request"
        );
        Ok(page)
    }
}
