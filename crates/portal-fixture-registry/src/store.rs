//! Per-kind entity store with title index
//!
//! Provides [`TitledStore`], an append-only, insertion-ordered map from
//! identifier to entity plus a title index updated on every insert.

use indexmap::IndexMap;
use portal_fixture_model::{EntityId, FixtureKind, Titled};
use std::collections::HashMap;

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The persistence layer returned an identifier that is already registered
    #[error("{kind} {id} is already registered")]
    DuplicateId {
        /// Kind of the rejected entity
        kind: FixtureKind,
        /// Repeated identifier
        id: EntityId,
    },
}

/// Entities of one kind, keyed by identifier and indexed by title
///
/// Title lookups return entities in registration order, so the first
/// registered entity wins when titles repeat.
#[derive(Debug, Clone)]
pub struct TitledStore<T> {
    entries: IndexMap<EntityId, T>,
    by_title: HashMap<String, Vec<EntityId>>,
}

impl<T: Titled> TitledStore<T> {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            by_title: HashMap::new(),
        }
    }

    /// Insert entity
    ///
    /// Returns `true` when another entity already carries the same title.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateId`] if the identifier is taken.
    pub fn insert(&mut self, entity: T) -> Result<bool, RegistryError> {
        let id = entity.id();
        if self.entries.contains_key(&id) {
            return Err(RegistryError::DuplicateId { kind: T::KIND, id });
        }

        let ids = self.by_title.entry(entity.title().to_string()).or_default();
        let shadowed = !ids.is_empty();
        ids.push(id);
        self.entries.insert(id, entity);

        Ok(shadowed)
    }

    /// Lookup by identifier
    #[inline]
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entries.get(&id)
    }

    /// First registered entity with `title`
    #[must_use]
    pub fn first_by_title(&self, title: &str) -> Option<&T> {
        self.by_title
            .get(title)
            .and_then(|ids| ids.first())
            .and_then(|id| self.entries.get(id))
    }

    /// Every entity with `title`, in registration order
    #[must_use]
    pub fn all_by_title(&self, title: &str) -> Vec<&T> {
        self.by_title
            .get(title)
            .map(|ids| ids.iter().filter_map(|id| self.entries.get(id)).collect())
            .unwrap_or_default()
    }

    /// Entities in registration order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Number of registered entities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Titled> Default for TitledStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
