//! Portal Fixture Model
//!
//! Types shared by every layer of the fixture system.
//!
//! # Core Concepts
//!
//! - [`Table`]: header + rows as written in a scenario
//! - [`EntityPayload`]: closed set of [`FieldId`]s with typed [`FieldValue`]s
//! - [`CreatedEntity`]: what the persistence layer hands back
//! - [`Group`], [`Dataset`], [`Resource`], [`Page`]: registered fixtures
//!
//! # Example
//!
//! ```rust
//! use portal_fixture_model::{EntityPayload, FieldId, FieldValue, FixtureKind, Table};
//!
//! let table = Table::from_slices(&["title"], &[&["Budget 2020"]]).unwrap();
//! assert_eq!(table.len(), 1);
//!
//! let payload = EntityPayload::new(FixtureKind::Dataset)
//!     .with(FieldId::Title, FieldValue::Text("Budget 2020".into()));
//! assert_eq!(payload.text(FieldId::Title), Some("Budget 2020"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod entity;
mod payload;
mod table;
mod types;

pub use entity::{
    Account, CreatedEntity, Dataset, Group, GroupRole, MembershipGrant, MembershipStatus, Page,
    Resource, Titled,
};
pub use payload::{EntityPayload, EntityRelation, FieldId, FieldValue, LANGUAGE_NONE};
pub use table::{Row, Table, TableError};
pub use types::{AccountId, EntityId, FixtureKind, ReferenceKind};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building fixtures
    pub use crate::{
        AccountId, CreatedEntity, Dataset, EntityId, EntityPayload, FieldId, FieldValue,
        FixtureKind, Group, Page, Resource, Row, Table, Titled,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
