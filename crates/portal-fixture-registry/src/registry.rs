//! Scenario-scoped entity registry
//!
//! Holds every fixture created while a scenario runs, plus the
//! title → url page map navigation steps read from. A registry is created
//! with its scenario and dropped with it; nothing here is process-wide.

use crate::store::{RegistryError, TitledStore};
use indexmap::IndexMap;
use portal_fixture_model::{Dataset, EntityId, FixtureKind, Group, Page, Resource, Titled};
use serde::Serialize;

/// Entities and pages created during one scenario
#[derive(Debug, Default)]
pub struct EntityRegistry {
    groups: TitledStore<Group>,
    datasets: TitledStore<Dataset>,
    resources: TitledStore<Resource>,
    pages: IndexMap<String, Page>,
}

impl EntityRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a created group
    ///
    /// # Errors
    /// Returns error if the group's identifier is already registered
    pub fn register_group(&mut self, group: Group) -> Result<(), RegistryError> {
        let title = group.title.clone();
        let shadowed = self.groups.insert(group)?;
        warn_shadowed(FixtureKind::Group, &title, shadowed);
        Ok(())
    }

    /// Register a created dataset
    ///
    /// # Errors
    /// Returns error if the dataset's identifier is already registered
    pub fn register_dataset(&mut self, dataset: Dataset) -> Result<(), RegistryError> {
        let title = dataset.title.clone();
        let shadowed = self.datasets.insert(dataset)?;
        warn_shadowed(FixtureKind::Dataset, &title, shadowed);
        Ok(())
    }

    /// Register a created resource
    ///
    /// # Errors
    /// Returns error if the resource's identifier is already registered
    pub fn register_resource(&mut self, resource: Resource) -> Result<(), RegistryError> {
        let title = resource.title.clone();
        let shadowed = self.resources.insert(resource)?;
        warn_shadowed(FixtureKind::Resource, &title, shadowed);
        Ok(())
    }

    /// Identifier of the first `kind` entity registered under `title`
    ///
    /// Pages and memberships carry no identifier and always return `None`.
    /// The entity itself comes from [`Self::group_by_title`],
    /// [`Self::dataset_by_title`] or [`Self::resource_by_title`].
    #[must_use]
    pub fn lookup_by_title(&self, kind: FixtureKind, title: &str) -> Option<EntityId> {
        match kind {
            FixtureKind::Group => self.groups.first_by_title(title).map(Titled::id),
            FixtureKind::Dataset => self.datasets.first_by_title(title).map(Titled::id),
            FixtureKind::Resource => self.resources.first_by_title(title).map(Titled::id),
            FixtureKind::Page | FixtureKind::GroupMembership => None,
        }
    }

    /// First group registered under `title`
    #[inline]
    #[must_use]
    pub fn group_by_title(&self, title: &str) -> Option<&Group> {
        self.groups.first_by_title(title)
    }

    /// First dataset registered under `title`
    #[inline]
    #[must_use]
    pub fn dataset_by_title(&self, title: &str) -> Option<&Dataset> {
        self.datasets.first_by_title(title)
    }

    /// First resource registered under `title`
    #[inline]
    #[must_use]
    pub fn resource_by_title(&self, title: &str) -> Option<&Resource> {
        self.resources.first_by_title(title)
    }

    /// Registered groups
    #[inline]
    #[must_use]
    pub fn groups(&self) -> &TitledStore<Group> {
        &self.groups
    }

    /// Registered datasets
    #[inline]
    #[must_use]
    pub fn datasets(&self) -> &TitledStore<Dataset> {
        &self.datasets
    }

    /// Registered resources
    #[inline]
    #[must_use]
    pub fn resources(&self) -> &TitledStore<Resource> {
        &self.resources
    }

    /// Add a navigable page
    ///
    /// A page registered under an existing title replaces its url and keeps
    /// its position. Returns the replaced page.
    pub fn register_page(&mut self, title: impl Into<String>, url: impl Into<String>) -> Option<Page> {
        let page = Page::new(title, url);
        tracing::trace!(title = %page.title, url = %page.url, "page registered");
        self.pages.insert(page.title.clone(), page)
    }

    /// Page registered under `title`
    #[inline]
    #[must_use]
    pub fn page(&self, title: &str) -> Option<&Page> {
        self.pages.get(title)
    }

    /// Pages in registration order
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    /// Total number of registered entities, pages excluded
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.groups.len() + self.datasets.len() + self.resources.len()
    }

    /// Serializable view of the registry contents
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot<'_> {
        RegistrySnapshot {
            pages: self.pages.values().collect(),
            groups: self.groups.iter().collect(),
            datasets: self.datasets.iter().collect(),
            resources: self.resources.iter().collect(),
        }
    }
}

/// Borrowed, serializable registry contents
#[derive(Debug, Serialize)]
pub struct RegistrySnapshot<'a> {
    /// Pages in registration order
    pub pages: Vec<&'a Page>,
    /// Groups in registration order
    pub groups: Vec<&'a Group>,
    /// Datasets in registration order
    pub datasets: Vec<&'a Dataset>,
    /// Resources in registration order
    pub resources: Vec<&'a Resource>,
}

fn warn_shadowed(kind: FixtureKind, title: &str, shadowed: bool) {
    if shadowed {
        tracing::warn!(
            %kind,
            title,
            "duplicate title registered; lookups by this title resolve to the first one"
        );
    }
}
