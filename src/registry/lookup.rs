//! Collaborator contracts consulted while answering go-get requests.

use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failure of an external lookup. Aborts the go-get handling of one request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("repository store unavailable: {0}")]
    Unavailable(String),

    #[error("permission check failed for {repository}: {reason}")]
    Permission { repository: String, reason: String },
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Repository lookup failed").into_response()
    }
}

/// Answers whether a repository name is known to the hosting server.
#[async_trait]
pub trait ProjectLookup: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool, LookupError>;
}

/// Answers access questions on behalf of the anonymous identity.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Whether anonymous users may read `refs/heads/*` of `repository`.
    async fn can_anonymous_read(&self, repository: &str) -> Result<bool, LookupError>;
}
