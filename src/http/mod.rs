//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → goimport middleware (answers ?go-get=1)
//!     → upstream.rs (forward everything else, or 404 without upstream)
//!     → Send to client
//! ```

pub mod server;
pub mod upstream;

pub use server::{apply_config_update, build_router, HttpServer};
pub use upstream::Upstream;
