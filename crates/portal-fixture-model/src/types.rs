//! Identifiers and kind enumerations
//!
//! Entities are addressed by the numeric identifier the portal assigns on
//! creation. Scenario authors never see these ids; they refer to entities by
//! title and to accounts by name.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the persistence layer to a created entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Wrap a raw identifier
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

impl AccountId {
    /// The anonymous account, used by the portal when no author is given
    pub const ANONYMOUS: Self = Self(0);

    /// Wrap a raw identifier
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of tabular fixture blocks a scenario can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
    /// Navigable page (title + url), stored without field mapping
    Page,
    /// Organisational group
    Group,
    /// Account-to-group grant; never registered as an entity
    GroupMembership,
    /// Dataset node
    Dataset,
    /// Resource node attached to a dataset
    Resource,
}

impl FixtureKind {
    /// Human-facing name, as used in scenario block headings
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Group => "group",
            Self::GroupMembership => "group membership",
            Self::Dataset => "dataset",
            Self::Resource => "resource",
        }
    }

    /// Machine bundle name handed to the persistence layer
    ///
    /// Returns `None` for kinds that are not persisted as entities.
    #[must_use]
    pub const fn bundle(self) -> Option<&'static str> {
        match self {
            Self::Group => Some("group"),
            Self::Dataset => Some("dataset"),
            Self::Resource => Some("resource"),
            Self::Page | Self::GroupMembership => None,
        }
    }
}

impl std::fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What a human-readable reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Account looked up by name
    Account,
    /// Group looked up by title
    Group,
    /// Dataset looked up by title
    Dataset,
    /// Group role looked up by name
    Role,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Account => "user",
            Self::Group => "group",
            Self::Dataset => "dataset",
            Self::Role => "group role",
        })
    }
}
