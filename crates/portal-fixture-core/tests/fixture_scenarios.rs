use portal_fixture_core::test_harness::InMemoryPortal;
use portal_fixture_core::{AuthorPolicy, FixtureBuilder, FixtureConfig, FixtureError};
use portal_fixture_model::{
    AccountId, EntityId, FieldId, FixtureKind, GroupRole, MembershipStatus, ReferenceKind,
};
use portal_fixture_registry::EntityRegistry;
use portal_fixture_test_utils::{seeded_portal, table};
use pretty_assertions::assert_eq;
use serde_json::json;

fn budget_dataset(portal: &mut InMemoryPortal, registry: &mut EntityRegistry, config: &FixtureConfig) {
    FixtureBuilder::new(portal, config)
        .add_datasets(
            registry,
            &table(&["title", "author"], &[&["Budget 2020", "alice"]]),
        )
        .unwrap();
}

#[test]
fn test_resource_links_to_registered_dataset() {
    let config = FixtureConfig::default();
    let mut portal = seeded_portal(&["alice"]);
    let mut registry = EntityRegistry::new();

    budget_dataset(&mut portal, &mut registry, &config);
    FixtureBuilder::new(&mut portal, &config)
        .add_resources(
            &mut registry,
            &table(&["title", "dataset"], &[&["Budget File", "Budget 2020"]]),
        )
        .unwrap();

    let dataset = registry.dataset_by_title("Budget 2020").unwrap();
    let resource = registry.resource_by_title("Budget File").unwrap();
    assert_eq!(dataset.author, AccountId::new(1));
    assert_eq!(resource.dataset, Some(dataset.id));

    let persisted = portal.entity(resource.id).unwrap();
    let body = serde_json::to_value(&persisted.payload).unwrap();
    assert_eq!(body["type"], json!("resource"));
    assert_eq!(
        body["field_dataset_ref"],
        json!({ "und": [{ "target_id": dataset.id.get() }] })
    );
}

#[test]
fn test_resource_without_dataset_block_fails() {
    let config = FixtureConfig::default();
    let mut portal = seeded_portal(&["alice"]);
    let mut registry = EntityRegistry::new();

    let err = FixtureBuilder::new(&mut portal, &config)
        .add_resources(
            &mut registry,
            &table(&["title", "dataset"], &[&["Budget File", "Budget 2020"]]),
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "no dataset was found with name 'Budget 2020'");
    assert!(err.is_reference_error());
    assert_eq!(portal.entities().count(), 0);
}

#[test]
fn test_membership_for_unknown_group_grants_nothing() {
    let config = FixtureConfig::default();
    let mut portal = seeded_portal(&["bob"]);
    let mut registry = EntityRegistry::new();

    let err = FixtureBuilder::new(&mut portal, &config)
        .add_group_memberships(
            &mut registry,
            &table(
                &["user", "group", "role on group", "membership status"],
                &[&["bob", "Finance", "member", "Active"]],
            ),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        FixtureError::EntityNotFound { reference: ReferenceKind::Group, ref name } if name == "Finance"
    ));
    assert!(portal.grants().is_empty());
}

#[test]
fn test_membership_grant_carries_role_and_status() {
    let config = FixtureConfig::default();
    let mut portal = seeded_portal(&["alice", "bob"]);
    let mut registry = EntityRegistry::new();
    let mut builder = FixtureBuilder::new(&mut portal, &config);

    builder
        .add_groups(&mut registry, &table(&["title", "author"], &[&["Finance", "alice"]]))
        .unwrap();
    builder
        .add_group_memberships(
            &mut registry,
            &table(
                &["user", "group", "role", "membership status"],
                &[
                    &["bob", "Finance", "administrator member", "Active"],
                    &["alice", "Finance", "member", "Suspended"],
                ],
            ),
        )
        .unwrap();

    let group = registry.group_by_title("Finance").unwrap().id;
    let grants = portal.grants();
    assert_eq!(grants.len(), 2);
    assert_eq!(grants[0].group, group);
    assert_eq!(grants[0].account, AccountId::new(2));
    assert_eq!(grants[0].role, Some(GroupRole::AdministratorMember));
    assert_eq!(grants[0].status, Some(MembershipStatus::Active));
    // Unknown status names fall back to none.
    assert_eq!(grants[1].status, None);
}

#[test]
fn test_membership_with_unknown_role_fails() {
    let config = FixtureConfig::default();
    let mut portal = seeded_portal(&["alice"]);
    let mut registry = EntityRegistry::new();
    let mut builder = FixtureBuilder::new(&mut portal, &config);

    builder
        .add_groups(&mut registry, &table(&["title"], &[&["Finance"]]))
        .unwrap();
    let err = builder
        .add_group_memberships(
            &mut registry,
            &table(&["user", "group", "role"], &[&["alice", "Finance", "owner"]]),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        FixtureError::EntityNotFound {
            reference: ReferenceKind::Role,
            ..
        }
    ));
    assert!(portal.grants().is_empty());
}

#[test]
fn test_moderation_state_is_per_row() {
    let config = FixtureConfig::default();
    let mut portal = seeded_portal(&["alice"]);
    let mut registry = EntityRegistry::new();

    FixtureBuilder::new(&mut portal, &config)
        .add_datasets(
            &mut registry,
            &table(
                &["title", "moderation"],
                &[
                    &["Budget 2019", "published"],
                    &["Budget 2020", ""],
                    &["Budget 2021", "needs_review"],
                ],
            ),
        )
        .unwrap();

    let states: Vec<_> = ["Budget 2019", "Budget 2020", "Budget 2021"]
        .iter()
        .map(|title| {
            let id = registry.dataset_by_title(title).unwrap().id;
            portal.moderation_state(id).unwrap().to_string()
        })
        .collect();
    assert_eq!(states, vec!["published", "draft", "needs_review"]);
}

#[test]
fn test_configured_default_moderation_state() {
    let config = FixtureConfig::default().with_default_moderation_state("published");
    let mut portal = seeded_portal(&["alice"]);
    let mut registry = EntityRegistry::new();

    budget_dataset(&mut portal, &mut registry, &config);

    let dataset = registry.dataset_by_title("Budget 2020").unwrap();
    assert_eq!(dataset.moderation_state, "published");
    let record = &portal.moderation_log()[0];
    assert_eq!(record.entity, dataset.id);
    assert_eq!(record.acting, Some(AccountId::new(1)));
    assert_eq!(portal.revision_author(dataset.id), Some(AccountId::new(1)));
}

#[test]
fn test_unknown_author_is_omitted_by_default() {
    let config = FixtureConfig::default();
    let mut portal = InMemoryPortal::new();
    let mut registry = EntityRegistry::new();

    budget_dataset(&mut portal, &mut registry, &config);

    let dataset = registry.dataset_by_title("Budget 2020").unwrap();
    assert_eq!(dataset.author, AccountId::ANONYMOUS);
    let persisted = portal.entity(dataset.id).unwrap();
    assert!(persisted.payload.get(FieldId::Author).is_none());
}

#[test]
fn test_unknown_author_fails_under_strict_policy() {
    let config = FixtureConfig::default().with_author_policy(AuthorPolicy::Fail);
    let mut portal = InMemoryPortal::new();
    let mut registry = EntityRegistry::new();

    let err = FixtureBuilder::new(&mut portal, &config)
        .add_datasets(
            &mut registry,
            &table(&["title", "author"], &[&["Budget 2020", "alice"]]),
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "no user was found with name 'alice'");
    assert_eq!(portal.entities().count(), 0);
}

#[test]
fn test_language_defaults_only_when_absent() {
    let config = FixtureConfig::default();
    let mut portal = InMemoryPortal::new();
    let mut registry = EntityRegistry::new();

    FixtureBuilder::new(&mut portal, &config)
        .add_datasets(
            &mut registry,
            &table(&["title", "language"], &[&["Presupuesto", "es"]]),
        )
        .unwrap();
    FixtureBuilder::new(&mut portal, &config)
        .add_datasets(&mut registry, &table(&["title"], &[&["Budget"]]))
        .unwrap();

    assert_eq!(registry.dataset_by_title("Presupuesto").unwrap().language, "es");
    assert_eq!(registry.dataset_by_title("Budget").unwrap().language, "und");
}

#[test]
fn test_entities_get_detail_pages() {
    let config = FixtureConfig::default();
    let mut portal = seeded_portal(&["alice"]);
    let mut registry = EntityRegistry::new();

    FixtureBuilder::new(&mut portal, &config)
        .add_groups(&mut registry, &table(&["title"], &[&["Finance"]]))
        .unwrap();
    budget_dataset(&mut portal, &mut registry, &config);

    assert_eq!(registry.page("Finance").unwrap().url, "/node/1");
    assert_eq!(registry.page("Budget 2020").unwrap().url, "/node/2");
}

#[test]
fn test_duplicate_dataset_titles_resolve_to_first() {
    let config = FixtureConfig::default();
    let mut portal = InMemoryPortal::new();
    let mut registry = EntityRegistry::new();
    let mut builder = FixtureBuilder::new(&mut portal, &config);

    builder
        .add_datasets(
            &mut registry,
            &table(&["title", "description"], &[&["Budget", "first"], &["Budget", "second"]]),
        )
        .unwrap();
    builder
        .add_resources(
            &mut registry,
            &table(&["title", "dataset"], &[&["Budget File", "Budget"]]),
        )
        .unwrap();

    let resource = registry.resource_by_title("Budget File").unwrap();
    assert_eq!(resource.dataset, Some(EntityId::new(1)));
    assert_eq!(registry.datasets().all_by_title("Budget").len(), 2);
}

#[test]
fn test_failing_row_keeps_earlier_rows() {
    let config = FixtureConfig::default();
    let mut portal = InMemoryPortal::new().rejecting_state("archived");
    let mut registry = EntityRegistry::new();

    let err = FixtureBuilder::new(&mut portal, &config)
        .add_datasets(
            &mut registry,
            &table(
                &["title", "moderation"],
                &[&["Budget 2019", "published"], &["Budget 2020", "archived"]],
            ),
        )
        .unwrap_err();

    assert!(matches!(err, FixtureError::Backend(_)));
    assert!(registry.dataset_by_title("Budget 2019").is_some());
    assert!(registry.dataset_by_title("Budget 2020").is_none());
}

#[test]
fn test_unmapped_column_aborts_block() {
    let config = FixtureConfig::default();
    let mut portal = InMemoryPortal::new();
    let mut registry = EntityRegistry::new();

    let err = FixtureBuilder::new(&mut portal, &config)
        .add_block(
            &mut registry,
            FixtureKind::Resource,
            &table(&["title", "tags"], &[&["Budget File", "finance"]]),
        )
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "resource field 'tags' doesn't exist, or hasn't been mapped"
    );
    assert_eq!(portal.entities().count(), 0);
}
