//! Canonical web URL normalization.

use axum::http::Uri;
use url::Url;

/// Error raised when the configured canonical URL cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("cannot parse {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} has no host")]
    MissingHost(String),

    #[error("{0} is not a valid HTTP URI")]
    InvalidUri(String),
}

/// The hosting server's public URL, normalized once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl {
    web_url: String,
    project_prefix: String,
}

impl CanonicalUrl {
    /// Normalize `raw` to end with exactly one `/` and derive the
    /// `host[:port]path` prefix used in go-import identities.
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let web_url = format!("{}/", raw.trim().trim_end_matches('/'));
        let parsed = Url::parse(&web_url).map_err(|source| UrlError::Parse {
            url: raw.to_string(),
            source,
        })?;
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingHost(raw.to_string()));
        }

        // `Url` lowercases the host and hides default ports; the prefix keeps
        // the authority exactly as configured.
        let uri: Uri = web_url
            .parse()
            .map_err(|_| UrlError::InvalidUri(raw.to_string()))?;
        let authority = uri
            .authority()
            .ok_or_else(|| UrlError::MissingHost(raw.to_string()))?;
        let port = authority
            .port_u16()
            .map(|p| format!(":{p}"))
            .unwrap_or_default();
        let project_prefix = format!("{}{port}{}", authority.host(), uri.path());

        Ok(Self {
            web_url,
            project_prefix,
        })
    }

    /// Base URL, always ending in `/`.
    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    /// `host[:port]/path/` as it appears in import paths.
    pub fn project_prefix(&self) -> &str {
        &self.project_prefix
    }
}
