use crate::backend::{AccountDirectory, EntityStore, MembershipService, ModerationWorkflow};
use crate::error::BackendError;
use indexmap::IndexMap;
use portal_fixture_model::{
    Account, AccountId, CreatedEntity, EntityId, EntityPayload, FieldId, MembershipGrant,
};
use std::collections::{HashMap, HashSet};

/// One moderation transition requested of the portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationRecord {
    pub entity: EntityId,
    pub state: String,
    pub acting: Option<AccountId>,
}

/// Portal that keeps every entity, grant and transition in memory
///
/// Entity and account ids are sequential from 1, in creation order.
#[derive(Debug)]
pub struct InMemoryPortal {
    next_entity: u64,
    next_account: u64,
    accounts: IndexMap<String, Account>,
    entities: IndexMap<EntityId, CreatedEntity>,
    revision_authors: HashMap<EntityId, AccountId>,
    grants: Vec<MembershipGrant>,
    moderation: Vec<ModerationRecord>,
    rejected_states: HashSet<String>,
}

impl InMemoryPortal {
    /// Create empty portal
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_entity: 1,
            next_account: 1,
            accounts: IndexMap::new(),
            entities: IndexMap::new(),
            revision_authors: HashMap::new(),
            grants: Vec::new(),
            moderation: Vec::new(),
            rejected_states: HashSet::new(),
        }
    }

    /// With account named `name`
    #[must_use]
    pub fn with_account(mut self, name: &str) -> Self {
        self.add_account(name);
        self
    }

    /// Make the workflow refuse transitions into `state`
    #[must_use]
    pub fn rejecting_state(mut self, state: &str) -> Self {
        self.rejected_states.insert(state.to_string());
        self
    }

    /// Add an account, returning the existing id if the name is taken
    pub fn add_account(&mut self, name: &str) -> AccountId {
        if let Some(account) = self.accounts.get(name) {
            return account.id;
        }
        let id = AccountId::new(self.next_account);
        self.next_account += 1;
        self.accounts.insert(
            name.to_string(),
            Account {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&CreatedEntity> {
        self.entities.get(&id)
    }

    /// Entities in creation order
    pub fn entities(&self) -> impl Iterator<Item = &CreatedEntity> {
        self.entities.values()
    }

    #[must_use]
    pub fn grants(&self) -> &[MembershipGrant] {
        &self.grants
    }

    #[must_use]
    pub fn moderation_log(&self) -> &[ModerationRecord] {
        &self.moderation
    }

    /// Latest moderation state of an entity
    #[must_use]
    pub fn moderation_state(&self, id: EntityId) -> Option<&str> {
        self.moderation
            .iter()
            .rev()
            .find(|record| record.entity == id)
            .map(|record| record.state.as_str())
    }

    #[must_use]
    pub fn revision_author(&self, id: EntityId) -> Option<AccountId> {
        self.revision_authors.get(&id).copied()
    }
}

impl Default for InMemoryPortal {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for InMemoryPortal {
    fn create(&mut self, payload: &EntityPayload) -> Result<CreatedEntity, BackendError> {
        let id = EntityId::new(self.next_entity);
        self.next_entity += 1;

        let created = CreatedEntity {
            id,
            title: payload.text(FieldId::Title).unwrap_or_default().to_string(),
            author: payload.author().unwrap_or(AccountId::ANONYMOUS),
            payload: payload.clone(),
        };
        self.entities.insert(id, created.clone());
        Ok(created)
    }

    fn set_revision_author(&mut self, id: EntityId, author: AccountId) -> Result<(), BackendError> {
        if !self.entities.contains_key(&id) {
            return Err(BackendError::failed(
                "set_revision_author",
                format!("no entity {id}"),
            ));
        }
        self.revision_authors.insert(id, author);
        Ok(())
    }
}

impl AccountDirectory for InMemoryPortal {
    fn find_by_name(&self, name: &str) -> Option<Account> {
        self.accounts.get(name).cloned()
    }
}

impl MembershipService for InMemoryPortal {
    fn grant(&mut self, grant: &MembershipGrant) -> Result<(), BackendError> {
        self.grants.push(grant.clone());
        Ok(())
    }
}

impl ModerationWorkflow for InMemoryPortal {
    fn set_state(
        &mut self,
        id: EntityId,
        state: &str,
        acting: Option<AccountId>,
    ) -> Result<(), BackendError> {
        if self.rejected_states.contains(state) {
            return Err(BackendError::failed(
                "set_state",
                format!("transition to '{state}' is not allowed"),
            ));
        }
        self.moderation.push(ModerationRecord {
            entity: id,
            state: state.to_string(),
            acting,
        });
        Ok(())
    }
}
