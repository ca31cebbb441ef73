//! Fixture builder
//!
//! One operation per fixture kind. Each iterates its table in order and, per
//! row: decode → resolve references → fill defaults → persist → register →
//! add the detail page. A failing row aborts the block; rows before it stay
//! persisted and registered.
//!
//! Resolution is a point-in-time scan of the registry, so a `datasets:` block
//! must run before any `resources:` block that names its datasets.

use crate::backend::PortalBackend;
use crate::config::{AuthorPolicy, FixtureConfig};
use crate::error::FixtureError;
use crate::mapper::{DecodedRow, FieldMapper};
use crate::moderation::ModerationManager;
use crate::resolver::ReferenceResolver;
use portal_fixture_model::{
    CreatedEntity, Dataset, EntityPayload, EntityRelation, FieldId, FieldValue, FixtureKind, Group,
    MembershipGrant, ReferenceKind, Resource, Table,
};
use portal_fixture_registry::EntityRegistry;

/// Builds fixtures from scenario tables against a portal backend
pub struct FixtureBuilder<'a, B: ?Sized> {
    backend: &'a mut B,
    config: &'a FixtureConfig,
    mapper: FieldMapper,
    moderation: ModerationManager,
}

impl<'a, B> FixtureBuilder<'a, B>
where
    B: PortalBackend + ?Sized,
{
    /// Create builder
    #[must_use]
    pub fn new(backend: &'a mut B, config: &'a FixtureConfig) -> Self {
        Self {
            backend,
            config,
            mapper: FieldMapper::new(),
            moderation: ModerationManager::new(config.default_moderation_state.clone()),
        }
    }

    /// Run the operation matching `kind`
    ///
    /// Returns the number of rows processed.
    ///
    /// # Errors
    /// Propagates the first row failure of the block.
    pub fn add_block(
        &mut self,
        registry: &mut EntityRegistry,
        kind: FixtureKind,
        table: &Table,
    ) -> Result<usize, FixtureError> {
        let rows = match kind {
            FixtureKind::Page => self.add_pages(registry, table)?,
            FixtureKind::Group => self.add_groups(registry, table)?,
            FixtureKind::GroupMembership => self.add_group_memberships(registry, table)?,
            FixtureKind::Dataset => self.add_datasets(registry, table)?,
            FixtureKind::Resource => self.add_resources(registry, table)?,
        };
        tracing::info!(%kind, rows, "fixture block applied");
        Ok(rows)
    }

    /// Store `title`/`url` rows in the page map as-is
    ///
    /// # Errors
    /// Returns [`FixtureError::MissingReference`] when a row lacks `title` or `url`.
    pub fn add_pages(
        &mut self,
        registry: &mut EntityRegistry,
        table: &Table,
    ) -> Result<usize, FixtureError> {
        let mut count = 0;
        for row in table.rows() {
            let title = required(&row, FixtureKind::Page, "title")?;
            let url = required(&row, FixtureKind::Page, "url")?;
            registry.register_page(title, url);
            count += 1;
        }
        Ok(count)
    }

    /// Create groups
    ///
    /// # Errors
    /// Fails on unmapped columns, unresolved authors under
    /// [`AuthorPolicy::Fail`], and backend failures.
    pub fn add_groups(
        &mut self,
        registry: &mut EntityRegistry,
        table: &Table,
    ) -> Result<usize, FixtureError> {
        let mut count = 0;
        for row in table.rows() {
            let DecodedRow {
                mut payload,
                author,
                ..
            } = self.mapper.decode(FixtureKind::Group, &row)?;
            self.resolve_author(registry, author.as_deref(), &mut payload)?;

            let created = self.backend.create(&payload)?;
            tracing::debug!(id = %created.id, title = %created.title, "group created");

            registry.register_group(Group::from_created(&created))?;
            self.register_detail_page(registry, &created);
            count += 1;
        }
        Ok(count)
    }

    /// Grant group memberships
    ///
    /// Nothing is registered; the grant is a side effect on the portal.
    ///
    /// # Errors
    /// - [`FixtureError::MissingReference`] when `group` or `user` is absent
    /// - [`FixtureError::EntityNotFound`] when the group, user or role does
    ///   not resolve; no grant is attempted for that row
    pub fn add_group_memberships(
        &mut self,
        registry: &mut EntityRegistry,
        table: &Table,
    ) -> Result<usize, FixtureError> {
        let mut count = 0;
        for row in table.rows() {
            let refs = self.mapper.decode_membership(&row)?;
            let group_title = refs.group.as_deref().ok_or(FixtureError::MissingReference {
                kind: FixtureKind::GroupMembership,
                column: "group",
            })?;
            let user_name = refs.user.as_deref().ok_or(FixtureError::MissingReference {
                kind: FixtureKind::GroupMembership,
                column: "user",
            })?;

            let resolver = ReferenceResolver::new(&*self.backend, registry);
            let group = resolver
                .resolve_group(group_title)
                .ok_or_else(|| FixtureError::not_found(ReferenceKind::Group, group_title))?
                .id;
            let account = resolver
                .resolve_account(user_name)
                .ok_or_else(|| FixtureError::not_found(ReferenceKind::Account, user_name))?;
            let role = refs
                .role
                .as_deref()
                .map(|name| {
                    resolver
                        .resolve_role(name)
                        .ok_or_else(|| FixtureError::not_found(ReferenceKind::Role, name))
                })
                .transpose()?;
            let status = refs
                .status
                .as_deref()
                .and_then(|name| resolver.resolve_membership_status(name));

            let grant = MembershipGrant {
                group,
                account,
                role,
                status,
            };
            tracing::debug!(?grant, group = group_title, user = user_name, "granting membership");
            self.backend.grant(&grant)?;
            count += 1;
        }
        Ok(count)
    }

    /// Create datasets
    ///
    /// # Errors
    /// Fails on unmapped columns, unresolved authors under
    /// [`AuthorPolicy::Fail`], and backend or workflow failures.
    pub fn add_datasets(
        &mut self,
        registry: &mut EntityRegistry,
        table: &Table,
    ) -> Result<usize, FixtureError> {
        let mut count = 0;
        for row in table.rows() {
            let DecodedRow {
                mut payload,
                author,
                moderation,
                ..
            } = self.mapper.decode(FixtureKind::Dataset, &row)?;
            self.resolve_author(registry, author.as_deref(), &mut payload)?;
            self.fill_defaults(&mut payload);

            let (created, state) = self.persist_moderated(&payload, moderation.as_deref())?;
            tracing::debug!(id = %created.id, title = %created.title, state = %state, "dataset created");

            registry.register_dataset(Dataset::from_created(&created, state))?;
            self.register_detail_page(registry, &created);
            count += 1;
        }
        Ok(count)
    }

    /// Create resources
    ///
    /// The `dataset` column must name a dataset registered earlier in the
    /// scenario; the check happens before anything is persisted.
    ///
    /// # Errors
    /// Fails on unmapped columns, unknown datasets, unresolved authors under
    /// [`AuthorPolicy::Fail`], and backend or workflow failures.
    pub fn add_resources(
        &mut self,
        registry: &mut EntityRegistry,
        table: &Table,
    ) -> Result<usize, FixtureError> {
        let mut count = 0;
        for row in table.rows() {
            let DecodedRow {
                mut payload,
                author,
                dataset,
                moderation,
            } = self.mapper.decode(FixtureKind::Resource, &row)?;

            if let Some(title) = dataset.as_deref() {
                let target = ReferenceResolver::new(&*self.backend, registry)
                    .resolve_dataset(title)
                    .ok_or_else(|| FixtureError::not_found(ReferenceKind::Dataset, title))?;
                payload.set(
                    FieldId::DatasetRef,
                    FieldValue::Relation(EntityRelation { target }),
                );
            }
            self.resolve_author(registry, author.as_deref(), &mut payload)?;
            self.fill_defaults(&mut payload);

            let (created, state) = self.persist_moderated(&payload, moderation.as_deref())?;
            tracing::debug!(id = %created.id, title = %created.title, state = %state, "resource created");

            registry.register_resource(Resource::from_created(&created, state))?;
            self.register_detail_page(registry, &created);
            count += 1;
        }
        Ok(count)
    }

    fn resolve_author(
        &self,
        registry: &EntityRegistry,
        name: Option<&str>,
        payload: &mut EntityPayload,
    ) -> Result<(), FixtureError> {
        let Some(name) = name else {
            return Ok(());
        };

        match ReferenceResolver::new(&*self.backend, registry).resolve_account(name) {
            Some(id) => {
                payload.set(FieldId::Author, FieldValue::Account(id));
                Ok(())
            }
            None => match self.config.author_policy {
                AuthorPolicy::Omit => {
                    tracing::warn!(
                        kind = %payload.kind(),
                        author = name,
                        "author not found, creating without one"
                    );
                    Ok(())
                }
                AuthorPolicy::Fail => Err(FixtureError::not_found(ReferenceKind::Account, name)),
            },
        }
    }

    fn fill_defaults(&self, payload: &mut EntityPayload) {
        payload.set_default(
            FieldId::Language,
            FieldValue::Text(self.config.default_language.clone()),
        );
    }

    // Persist, make the author the revision author, then moderate.
    fn persist_moderated(
        &mut self,
        payload: &EntityPayload,
        explicit_state: Option<&str>,
    ) -> Result<(CreatedEntity, String), FixtureError> {
        let created = self.backend.create(payload)?;
        self.backend.set_revision_author(created.id, created.author)?;

        let state = self.moderation.resolve_state(explicit_state).to_string();
        self.moderation
            .apply(&mut *self.backend, created.id, &state, Some(created.author))?;

        Ok((created, state))
    }

    fn register_detail_page(&self, registry: &mut EntityRegistry, created: &CreatedEntity) {
        registry.register_page(created.title.clone(), self.config.entity_url(created.id));
    }
}

fn required(
    row: &portal_fixture_model::Row,
    kind: FixtureKind,
    column: &'static str,
) -> Result<String, FixtureError> {
    row.get(column)
        .cloned()
        .ok_or(FixtureError::MissingReference { kind, column })
}
