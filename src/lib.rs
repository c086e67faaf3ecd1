//! go-get discovery service for code-hosting servers with nested repository names.

pub mod config;
pub mod goimport;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;

pub use config::GoImportConfig;
pub use goimport::{CanonicalUrl, GoImport};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::{AccessPolicy, LookupError, ProjectLookup, RepositoryRegistry};
