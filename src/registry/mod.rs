//! Repository existence and access-policy lookups.
//!
//! # Data Flow
//! ```text
//! go-get request
//!     → ProjectLookup::exists (once per candidate prefix)
//!     → AccessPolicy::can_anonymous_read (once per resolved repository)
//! ```
//!
//! The traits are the seam to the hosting server. `RepositoryRegistry` is the
//! built-in implementation backed by `[[repositories]]` in the config file.

pub mod lookup;
pub mod memory;

pub use lookup::{AccessPolicy, LookupError, ProjectLookup};
pub use memory::{normalize_name, RepositoryRegistry};
