//! go-get interception middleware.
//!
//! Requests with `go-get=1` are answered here; everything else goes to the
//! next handler untouched.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use percent_encoding::percent_decode_str;

use crate::goimport::{GoImport, GoImportPage};
use crate::observability::metrics;

/// Query parameter sent by `go get` when probing for a module's source.
pub const GO_GET_PARAM: &str = "go-get";

/// True when the first `go-get` parameter in `query` is exactly `1`.
pub fn is_go_get(query: Option<&str>) -> bool {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == GO_GET_PARAM)
                .map(|(_, value)| value == "1")
        })
        .unwrap_or(false)
}

/// Percent-decode the request path. `None` when the bytes are not UTF-8.
pub fn decode_path(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|path| path.into_owned())
}

pub async fn go_import_middleware(
    State(go_import): State<Arc<GoImport>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !is_go_get(request.uri().query()) {
        metrics::record_passthrough();
        return next.run(request).await;
    }

    let Some(path) = decode_path(request.uri().path()) else {
        tracing::debug!(path = %request.uri().path(), "go-get path is not UTF-8");
        metrics::record_request("not_found");
        return GoImportPage::not_found().into_response();
    };

    match go_import.handle(&path).await {
        Ok(page) => {
            metrics::record_request(if page.status.is_success() {
                "found"
            } else {
                "not_found"
            });
            page.into_response()
        }
        Err(e) => {
            tracing::error!(path = %path, error = %e, "go-get lookup failed");
            metrics::record_request("error");
            e.into_response()
        }
    }
}
