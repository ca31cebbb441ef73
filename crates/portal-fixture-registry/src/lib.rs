//! Portal Fixture Registry
//!
//! In-memory record of the fixtures a scenario has created.
//!
//! # Overview
//!
//! - **EntityRegistry**: groups, datasets and resources keyed by identifier,
//!   indexed by title, plus the page map
//! - **TitledStore**: the per-kind append-only store behind it
//!
//! # Example
//!
//! ```rust
//! use portal_fixture_registry::EntityRegistry;
//!
//! let mut registry = EntityRegistry::new();
//! registry.register_page("Home", "/");
//! assert_eq!(registry.page("Home").map(|p| p.url.as_str()), Some("/"));
//! ```

#![warn(missing_docs)]

pub mod registry;
pub mod store;

// Re-exports
pub use registry::{EntityRegistry, RegistrySnapshot};
pub use store::{RegistryError, TitledStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
