//! Mail capture guard
//!
//! Swaps the portal's mail system for the testing collector for the lifetime
//! of the guard. The previous mail system comes back on drop, on every exit
//! path including unwinding.

use crate::backend::VariableStore;
use serde_json::{json, Value};

/// Variable naming the active mail system
pub const MAIL_SYSTEM_VARIABLE: &str = "mail_system";

/// Variable the testing mail system appends captured messages to
pub const MAIL_COLLECTOR_VARIABLE: &str = "drupal_test_email_collector";

/// Scoped installation of the testing mail system
#[must_use = "the original mail system is restored when the guard is dropped"]
pub struct MailCaptureGuard<'a, V: VariableStore + ?Sized> {
    vars: &'a V,
    original: Value,
}

impl<'a, V> MailCaptureGuard<'a, V>
where
    V: VariableStore + ?Sized,
{
    /// Install the testing mail system and empty the collector
    pub fn install(vars: &'a V) -> Self {
        let original = vars
            .get(MAIL_SYSTEM_VARIABLE)
            .unwrap_or_else(|| json!({ "default-system": "DefaultMailSystem" }));

        tracing::info!("installing testing mail system");
        vars.set(
            MAIL_SYSTEM_VARIABLE,
            json!({ "default-system": "TestingMailSystem" }),
        );
        vars.set(MAIL_COLLECTOR_VARIABLE, json!([]));

        Self { vars, original }
    }

    /// Mail system that will be restored
    #[inline]
    #[must_use]
    pub fn original(&self) -> &Value {
        &self.original
    }

    /// Messages captured so far
    #[must_use]
    pub fn captured_mail(&self) -> Vec<Value> {
        match self.vars.get(MAIL_COLLECTOR_VARIABLE) {
            Some(Value::Array(messages)) => messages,
            _ => Vec::new(),
        }
    }
}

impl<V> Drop for MailCaptureGuard<'_, V>
where
    V: VariableStore + ?Sized,
{
    fn drop(&mut self) {
        tracing::info!("restoring mail system");
        self.vars
            .set(MAIL_SYSTEM_VARIABLE, std::mem::take(&mut self.original));
        self.vars.set(MAIL_COLLECTOR_VARIABLE, json!([]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::InMemoryVariables;
    use pretty_assertions::assert_eq;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn installs_and_restores_recorded_system() {
        let vars = InMemoryVariables::new();
        vars.set(MAIL_SYSTEM_VARIABLE, json!({ "default-system": "SmtpMailSystem" }));

        {
            let guard = MailCaptureGuard::install(&vars);
            assert_eq!(
                vars.get(MAIL_SYSTEM_VARIABLE),
                Some(json!({ "default-system": "TestingMailSystem" }))
            );
            vars.set(MAIL_COLLECTOR_VARIABLE, json!([{ "to": "alice@example.com" }]));
            assert_eq!(guard.captured_mail().len(), 1);
        }

        assert_eq!(
            vars.get(MAIL_SYSTEM_VARIABLE),
            Some(json!({ "default-system": "SmtpMailSystem" }))
        );
        assert_eq!(vars.get(MAIL_COLLECTOR_VARIABLE), Some(json!([])));
    }

    #[test]
    fn unset_system_restores_default() {
        let vars = InMemoryVariables::new();
        let guard = MailCaptureGuard::install(&vars);
        assert_eq!(
            guard.original(),
            &json!({ "default-system": "DefaultMailSystem" })
        );
        drop(guard);

        assert_eq!(
            vars.get(MAIL_SYSTEM_VARIABLE),
            Some(json!({ "default-system": "DefaultMailSystem" }))
        );
    }

    #[test]
    fn restores_when_scenario_panics() {
        let vars = InMemoryVariables::new();
        vars.set(MAIL_SYSTEM_VARIABLE, json!({ "default-system": "SmtpMailSystem" }));

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _guard = MailCaptureGuard::install(&vars);
            panic!("step failed");
        }));

        assert!(outcome.is_err());
        assert_eq!(
            vars.get(MAIL_SYSTEM_VARIABLE),
            Some(json!({ "default-system": "SmtpMailSystem" }))
        );
    }
}
