//! go-import response documents.
//!
//! # Responsibilities
//! - Pick the clone URL from the anonymous read policy
//! - Render the FOUND / NOT FOUND documents
//! - Mark responses non-cacheable with an exact Content-Length

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::goimport::canonical::CanonicalUrl;
use crate::goimport::resolver::AUTH_MARKER;
use crate::registry::{AccessPolicy, LookupError};

pub const PAGE_404: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n  \
<title>Gerrit-Go-Import</title>\n  \
<meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\"/>\n\
</head>\n\
<body>\n\
NOT FOUND\n\
</body>\n\
</html>";

const PAGE_200_HEAD: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n  \
<title>Gerrit-Go-Import</title>\n  \
<meta http-equiv=\"Content-Type\" content=\"text/html; charset=UTF-8\"/>\n  \
<meta name=\"go-import\" content=\"";

const PAGE_200_TAIL: &str = "\"/>\n\
</head>\n\
<body>\n\
<div>\n  \
Gerrit-Go-Import\n\
</div>\n\
</body>\n\
</html>";

const CACHE_CONTROL: &str = "no-cache, no-store, max-age=0, must-revalidate";
const EXPIRES: &str = "Fri, 01 Jan 1990 00:00:00 GMT";

/// A rendered go-get answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoImportPage {
    pub status: StatusCode,
    pub body: String,
}

impl GoImportPage {
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: PAGE_404.to_string(),
        }
    }

    /// FOUND document with `content` placed in the go-import meta tag.
    pub fn found(content: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: format!("{PAGE_200_HEAD}{content}{PAGE_200_TAIL}"),
        }
    }
}

impl IntoResponse for GoImportPage {
    fn into_response(self) -> Response {
        let len = self.body.len();
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=UTF-8"),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, HeaderValue::from_static(EXPIRES));
        response
    }
}

/// Builds the answer for a resolved (or unresolved) repository.
#[derive(Clone)]
pub struct ResponseBuilder {
    url: CanonicalUrl,
    access: Arc<dyn AccessPolicy>,
}

impl ResponseBuilder {
    pub fn new(url: CanonicalUrl, access: Arc<dyn AccessPolicy>) -> Self {
        Self { url, access }
    }

    pub fn canonical_url(&self) -> &CanonicalUrl {
        &self.url
    }

    /// Render the page for `resolved`.
    ///
    /// Consults the access policy exactly once when a repository was
    /// resolved and never otherwise.
    pub async fn build(
        &self,
        resolved: Option<&str>,
        authenticated: bool,
    ) -> Result<GoImportPage, LookupError> {
        let Some(repository) = resolved else {
            return Ok(GoImportPage::not_found());
        };

        crate::observability::metrics::record_lookup("anonymous_read");
        let anonymous_allowed = self.access.can_anonymous_read(repository).await?;

        let web_url = self.url.web_url();
        let clone_url = if anonymous_allowed && !authenticated {
            format!("{web_url}{repository}")
        } else {
            format!("{web_url}{AUTH_MARKER}/{repository}")
        };

        let marker = if authenticated {
            format!("{AUTH_MARKER}/")
        } else {
            String::new()
        };
        let identity = format!("{}{marker}{repository}", self.url.project_prefix());

        Ok(GoImportPage::found(&format!("{identity} git {clone_url}")))
    }
}
