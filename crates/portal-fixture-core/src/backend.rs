//! External collaborator seams
//!
//! The fixture layer never talks to the portal directly. Persistence, account
//! lookup, group membership, moderation, the browser session and site
//! variables are all reached through the traits below. All calls are
//! synchronous; a returned error aborts the current step.

use crate::error::BackendError;
use portal_fixture_model::{
    Account, AccountId, CreatedEntity, EntityId, EntityPayload, MembershipGrant,
};
use serde_json::Value;

/// Entity persistence
#[cfg_attr(test, mockall::automock)]
pub trait EntityStore {
    /// Persist a new entity
    fn create(&mut self, payload: &EntityPayload) -> Result<CreatedEntity, BackendError>;

    /// Record `author` as the author of the entity's current revision
    fn set_revision_author(&mut self, id: EntityId, author: AccountId) -> Result<(), BackendError>;
}

/// Account lookup
#[cfg_attr(test, mockall::automock)]
pub trait AccountDirectory {
    /// Find an account by login name
    fn find_by_name(&self, name: &str) -> Option<Account>;
}

/// Group membership management
#[cfg_attr(test, mockall::automock)]
pub trait MembershipService {
    /// Add an account to a group with an optional role and status
    fn grant(&mut self, grant: &MembershipGrant) -> Result<(), BackendError>;
}

/// Content moderation workflow
#[cfg_attr(test, mockall::automock)]
pub trait ModerationWorkflow {
    /// Move an entity to `state`, acting as `acting` when given
    fn set_state(
        &mut self,
        id: EntityId,
        state: &str,
        acting: Option<AccountId>,
    ) -> Result<(), BackendError>;
}

/// Everything the fixture builder needs from the portal
pub trait PortalBackend: EntityStore + AccountDirectory + MembershipService + ModerationWorkflow {}

impl<T> PortalBackend for T where T: EntityStore + AccountDirectory + MembershipService + ModerationWorkflow {}

/// Browser session driving the rendered site
#[cfg_attr(test, mockall::automock)]
pub trait BrowserSession {
    /// Navigate to an absolute or site-relative url
    fn visit(&mut self, url: &str) -> Result<(), BackendError>;

    /// Status code of the last response
    ///
    /// Drivers that cannot observe status codes return
    /// [`BackendError::Unsupported`].
    fn status_code(&self) -> Result<u16, BackendError>;

    /// Number of elements on the current page matching `selector`
    fn count(&self, selector: &str) -> usize;

    /// Fill `field` inside the single `form` with `value` and press `button`
    fn submit_form(
        &mut self,
        form: &str,
        field: &str,
        value: &str,
        button: &str,
    ) -> Result<(), BackendError>;

    /// Text of the first `element` inside each `row` of `region`, in page order
    fn texts(&self, region: &str, row: &str, element: &str) -> Vec<String>;
}

/// Persistent site variables
///
/// Takes `&self` so a scoped guard can hold the store while the scenario
/// keeps using other collaborators.
pub trait VariableStore {
    /// Current value of a variable
    fn get(&self, name: &str) -> Option<Value>;

    /// Overwrite a variable
    fn set(&self, name: &str, value: Value);
}
