//! Moderation state manager
//!
//! Moderation is applied after an entity is persisted, never as part of its
//! creation payload. Any state name is forwarded as-is; legality of the
//! transition is the workflow's concern.

use crate::backend::ModerationWorkflow;
use crate::error::FixtureError;
use portal_fixture_model::{AccountId, EntityId};

/// Applies moderation states with a fallback default
#[derive(Debug, Clone)]
pub struct ModerationManager {
    default_state: String,
}

impl ModerationManager {
    /// Create manager falling back to `default_state`
    #[inline]
    #[must_use]
    pub fn new(default_state: impl Into<String>) -> Self {
        Self {
            default_state: default_state.into(),
        }
    }

    /// State a row asks for, or the default when it names none
    #[must_use]
    pub fn resolve_state<'s>(&'s self, explicit: Option<&'s str>) -> &'s str {
        explicit.unwrap_or(&self.default_state)
    }

    /// Move `entity` into `state`
    ///
    /// # Errors
    /// Returns [`FixtureError::Backend`] if the workflow rejects the state.
    pub fn apply<W>(
        &self,
        workflow: &mut W,
        entity: EntityId,
        state: &str,
        acting: Option<AccountId>,
    ) -> Result<(), FixtureError>
    where
        W: ModerationWorkflow + ?Sized,
    {
        tracing::debug!(%entity, state, "applying moderation state");
        workflow.set_state(entity, state, acting)?;
        Ok(())
    }
}

impl Default for ModerationManager {
    fn default() -> Self {
        Self::new("draft")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockModerationWorkflow;
    use crate::error::BackendError;

    #[test]
    fn default_state_is_draft() {
        let manager = ModerationManager::default();
        assert_eq!(manager.resolve_state(None), "draft");
        assert_eq!(manager.resolve_state(Some("published")), "published");
    }

    #[test]
    fn apply_forwards_state_unchanged() {
        let mut workflow = MockModerationWorkflow::new();
        workflow
            .expect_set_state()
            .withf(|id, state, acting| {
                *id == EntityId::new(3) && state == "needs_review" && *acting == Some(AccountId::new(2))
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        ModerationManager::default()
            .apply(&mut workflow, EntityId::new(3), "needs_review", Some(AccountId::new(2)))
            .unwrap();
    }

    #[test]
    fn apply_surfaces_workflow_rejection() {
        let mut workflow = MockModerationWorkflow::new();
        workflow
            .expect_set_state()
            .returning(|_, _, _| Err(BackendError::failed("moderate", "unknown state")));

        let err = ModerationManager::default()
            .apply(&mut workflow, EntityId::new(3), "bogus", None)
            .unwrap_err();
        assert!(matches!(err, FixtureError::Backend(_)));
    }
}
