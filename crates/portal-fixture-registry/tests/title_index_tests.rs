use portal_fixture_model::{AccountId, EntityId, FixtureKind, Group};
use portal_fixture_registry::EntityRegistry;
use proptest::prelude::*;

fn group(id: u64, title: &str) -> Group {
    Group {
        id: EntityId::new(id),
        title: title.to_string(),
        author: AccountId::ANONYMOUS,
        published: Some("1".to_string()),
    }
}

#[test]
fn test_duplicate_ids_are_rejected_and_state_is_untouched() {
    let mut registry = EntityRegistry::new();
    registry.register_group(group(1, "Finance")).unwrap();

    assert!(registry.register_group(group(1, "Health")).is_err());
    assert!(registry.group_by_title("Health").is_none());
    assert_eq!(registry.groups().len(), 1);
}

proptest! {
    #[test]
    fn test_lookup_returns_first_registered_title(
        titles in proptest::collection::vec("[a-c]", 1..30)
    ) {
        let mut registry = EntityRegistry::new();
        for (i, title) in titles.iter().enumerate() {
            registry.register_group(group(i as u64 + 1, title)).unwrap();
        }

        for title in &titles {
            let first = titles.iter().position(|t| t == title).unwrap() as u64 + 1;
            prop_assert_eq!(
                registry.lookup_by_title(FixtureKind::Group, title),
                Some(EntityId::new(first))
            );
        }
        prop_assert_eq!(registry.groups().len(), titles.len());
    }
}
