//! Reference resolver
//!
//! Turns human-readable names and titles into identifiers. Every lookup is a
//! point-in-time read of state that already exists: accounts through the
//! account collaborator, groups and datasets through the scenario registry.
//! Lookups return `Option`; callers decide whether a miss is fatal.

use crate::backend::AccountDirectory;
use portal_fixture_model::{AccountId, EntityId, Group, GroupRole, MembershipStatus};
use portal_fixture_registry::EntityRegistry;

/// Read-only resolver over accounts and registered entities
pub struct ReferenceResolver<'a, A: ?Sized> {
    accounts: &'a A,
    registry: &'a EntityRegistry,
}

impl<'a, A> ReferenceResolver<'a, A>
where
    A: AccountDirectory + ?Sized,
{
    /// Create resolver
    #[inline]
    #[must_use]
    pub fn new(accounts: &'a A, registry: &'a EntityRegistry) -> Self {
        Self { accounts, registry }
    }

    /// Account id for a login name
    #[must_use]
    pub fn resolve_account(&self, name: &str) -> Option<AccountId> {
        self.accounts.find_by_name(name).map(|account| account.id)
    }

    /// First registered group with `title`
    #[inline]
    #[must_use]
    pub fn resolve_group(&self, title: &str) -> Option<&'a Group> {
        self.registry.group_by_title(title)
    }

    /// Id of the first registered dataset with `title`
    #[inline]
    #[must_use]
    pub fn resolve_dataset(&self, title: &str) -> Option<EntityId> {
        self.registry.dataset_by_title(title).map(|dataset| dataset.id)
    }

    /// Group role by exact name
    #[inline]
    #[must_use]
    pub fn resolve_role(&self, name: &str) -> Option<GroupRole> {
        GroupRole::from_name(name)
    }

    /// Membership status by exact name; unknown names mean "no status"
    #[inline]
    #[must_use]
    pub fn resolve_membership_status(&self, name: &str) -> Option<MembershipStatus> {
        MembershipStatus::from_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockAccountDirectory;
    use portal_fixture_model::{Account, Dataset};

    fn dataset(id: u64, title: &str) -> Dataset {
        Dataset {
            id: EntityId::new(id),
            title: title.to_string(),
            author: AccountId::ANONYMOUS,
            description: None,
            language: "und".into(),
            tags: vec![],
            publishers: vec![],
            moderation_state: "draft".into(),
            created: None,
        }
    }

    #[test]
    fn resolves_account_through_directory() {
        let mut accounts = MockAccountDirectory::new();
        accounts
            .expect_find_by_name()
            .withf(|name| name == "alice")
            .returning(|name| {
                Some(Account {
                    id: AccountId::new(7),
                    name: name.to_string(),
                })
            });
        accounts
            .expect_find_by_name()
            .withf(|name| name == "nobody")
            .returning(|_| None);

        let registry = EntityRegistry::new();
        let resolver = ReferenceResolver::new(&accounts, &registry);

        assert_eq!(resolver.resolve_account("alice"), Some(AccountId::new(7)));
        assert_eq!(resolver.resolve_account("nobody"), None);
    }

    #[test]
    fn resolves_dataset_first_match() {
        let mut registry = EntityRegistry::new();
        registry.register_dataset(dataset(4, "Budget 2020")).unwrap();
        registry.register_dataset(dataset(8, "Budget 2020")).unwrap();

        let accounts = MockAccountDirectory::new();
        let resolver = ReferenceResolver::new(&accounts, &registry);

        assert_eq!(resolver.resolve_dataset("Budget 2020"), Some(EntityId::new(4)));
        assert_eq!(resolver.resolve_dataset("Budget 2021"), None);
        assert!(resolver.resolve_group("Budget 2020").is_none());
    }

    #[test]
    fn fixed_enumerations() {
        let accounts = MockAccountDirectory::new();
        let registry = EntityRegistry::new();
        let resolver = ReferenceResolver::new(&accounts, &registry);

        assert_eq!(resolver.resolve_role("member"), Some(GroupRole::Member));
        assert_eq!(resolver.resolve_role("owner"), None);
        assert_eq!(
            resolver.resolve_membership_status("Blocked"),
            Some(MembershipStatus::Blocked)
        );
        assert_eq!(resolver.resolve_membership_status("active"), None);
    }
}
