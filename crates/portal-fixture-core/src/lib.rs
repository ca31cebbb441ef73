//! Portal Fixture Core
//!
//! Builds data-portal fixtures (pages, groups, memberships, datasets and
//! resources) from scenario tables, and provides the navigation and mail
//! steps that run against them.
//!
//! # Pipeline
//!
//! Each row goes through: decode → resolve references → fill defaults →
//! persist → register → add detail page. Failures abort the block.
//!
//! # Quick Start
//!
//! ```rust
//! use portal_fixture_core::prelude::*;
//! use portal_fixture_core::test_harness::InMemoryPortal;
//!
//! let mut portal = InMemoryPortal::new().with_account("alice");
//! let config = FixtureConfig::default();
//! let mut registry = EntityRegistry::new();
//!
//! let datasets = Table::from_slices(&["title", "author"], &[&["Budget 2020", "alice"]]).unwrap();
//! let resources = Table::from_slices(&["title", "dataset"], &[&["Budget File", "Budget 2020"]]).unwrap();
//!
//! let mut builder = FixtureBuilder::new(&mut portal, &config);
//! builder.add_datasets(&mut registry, &datasets).unwrap();
//! builder.add_resources(&mut registry, &resources).unwrap();
//!
//! let dataset = registry.dataset_by_title("Budget 2020").unwrap();
//! assert_eq!(registry.resource_by_title("Budget File").unwrap().dataset, Some(dataset.id));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod backend;
pub mod builder;
pub mod config;
pub mod error;
pub mod mail;
pub mod mapper;
pub mod moderation;
pub mod navigation;
pub mod resolver;
pub mod scenario;

// In-memory collaborators
pub mod test_harness;

// Re-exports
pub use backend::{
    AccountDirectory, BrowserSession, EntityStore, MembershipService, ModerationWorkflow,
    PortalBackend, VariableStore,
};
pub use builder::FixtureBuilder;
pub use config::{AuthorPolicy, FixtureConfig, SearchSelectors};
pub use error::{BackendError, FixtureError};
pub use mail::MailCaptureGuard;
pub use mapper::{split_list, FieldMapper};
pub use moderation::ModerationManager;
pub use navigation::Navigator;
pub use resolver::ReferenceResolver;
pub use scenario::{Feature, RunSummary, ScenarioBlock, ScenarioRunner};

/// Common imports for scenario steps
pub mod prelude {
    pub use crate::backend::{BrowserSession, PortalBackend, VariableStore};
    pub use crate::builder::FixtureBuilder;
    pub use crate::config::{AuthorPolicy, FixtureConfig};
    pub use crate::error::{BackendError, FixtureError};
    pub use crate::mail::MailCaptureGuard;
    pub use crate::navigation::Navigator;
    pub use crate::scenario::{Feature, ScenarioRunner};
    pub use portal_fixture_model::prelude::*;
    pub use portal_fixture_registry::EntityRegistry;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
