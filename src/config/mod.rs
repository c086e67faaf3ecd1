//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GoImportConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → repository registry swapped atomically
//!     → canonical URL stays as loaded at startup
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    GoImportConfig, ListenerConfig, ObservabilityConfig, RepositoryConfig, ServerConfig,
    TimeoutConfig, UpstreamConfig,
};
pub use validation::ValidationError;
pub use watcher::ConfigWatcher;
