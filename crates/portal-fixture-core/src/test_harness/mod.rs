//! In-memory collaborators
//!
//! A portal, a browser session and a variable store that live entirely in
//! process. The scenario runner binary drives them, and integration suites use
//! them to observe what the fixture layer asked the portal to do.

mod portal;
mod session;

pub use portal::{InMemoryPortal, ModerationRecord};
pub use session::{InMemorySession, RenderedPage};

use crate::backend::VariableStore;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

/// Site variables behind a mutex
#[derive(Debug, Default)]
pub struct InMemoryVariables {
    values: Mutex<HashMap<String, Value>>,
}

impl InMemoryVariables {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl VariableStore for InMemoryVariables {
    fn get(&self, name: &str) -> Option<Value> {
        self.values.lock().get(name).cloned()
    }

    fn set(&self, name: &str, value: Value) {
        self.values.lock().insert(name.to_string(), value);
    }
}
