//! Error types for fixture construction and scenario steps
//!
//! Every error aborts the current step. Nothing is retried; rows processed
//! before the failure stay persisted.

use portal_fixture_model::{FixtureKind, ReferenceKind, TableError};
use portal_fixture_registry::RegistryError;

/// Main fixture error type
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// Column not in the allow-list for the fixture kind
    #[error("{kind} field '{column}' doesn't exist, or hasn't been mapped")]
    UnmappedField {
        /// Kind whose allow-list was consulted
        kind: FixtureKind,
        /// Offending column
        column: String,
    },

    /// A required reference column is absent from the row
    #[error("{kind} row is missing the required '{column}' column")]
    MissingReference {
        /// Kind of the row
        kind: FixtureKind,
        /// Missing column
        column: &'static str,
    },

    /// A named reference did not resolve
    #[error("no {reference} was found with name '{name}'")]
    EntityNotFound {
        /// What was being looked up
        reference: ReferenceKind,
        /// Name or title given in the row
        name: String,
    },

    /// Navigation to a page title that was never registered
    #[error("page '{title}' not found in the pages map, was it added?")]
    PageNotFound {
        /// Requested title
        title: String,
    },

    /// Page visit returned a status outside [200, 300)
    #[error("page '{title}' ({url}) visited, but it returned a non-2XX response code of {status}")]
    NonSuccessStatus {
        /// Page title
        title: String,
        /// Visited url
        url: String,
        /// Returned status
        status: u16,
    },

    /// Expected region absent from the page
    #[error("no region matching '{selector}' found on the page")]
    RegionNotFound {
        /// Selector searched for
        selector: String,
    },

    /// More regions matched than the single one expected
    #[error("expected exactly one region matching '{selector}', found {found}")]
    CountMismatch {
        /// Selector searched for
        selector: String,
        /// Number of matches
        found: usize,
    },

    /// Expected text absent from the result rows
    #[error("the text '{text}' was not found")]
    AssertionFailed {
        /// Expected text
        text: String,
    },

    /// Scenario text names a block this layer cannot build
    #[error("line {line}: unknown fixture block '{name}'")]
    UnknownBlock {
        /// Source line
        line: usize,
        /// Block heading as written
        name: String,
    },

    /// Malformed scenario table
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Registry rejected a created entity
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Collaborator failure
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl FixtureError {
    /// Check if error comes from an unresolved or missing reference
    #[inline]
    #[must_use]
    pub fn is_reference_error(&self) -> bool {
        matches!(
            self,
            Self::MissingReference { .. } | Self::EntityNotFound { .. }
        )
    }

    /// Check if error comes from a page or rendered-content assertion
    #[inline]
    #[must_use]
    pub fn is_ui_error(&self) -> bool {
        matches!(
            self,
            Self::PageNotFound { .. }
                | Self::NonSuccessStatus { .. }
                | Self::RegionNotFound { .. }
                | Self::CountMismatch { .. }
                | Self::AssertionFailed { .. }
        )
    }

    /// Shorthand for [`FixtureError::EntityNotFound`]
    #[inline]
    pub fn not_found(reference: ReferenceKind, name: impl Into<String>) -> Self {
        Self::EntityNotFound {
            reference,
            name: name.into(),
        }
    }
}

/// Failure reported by an external collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Collaborator rejected the operation
    #[error("{operation} failed: {message}")]
    Failed {
        /// Operation name
        operation: &'static str,
        /// Collaborator message
        message: String,
    },

    /// Driver does not implement the operation
    #[error("{0} is not supported by this driver")]
    Unsupported(&'static str),
}

impl BackendError {
    /// Create a failure for `operation`
    #[inline]
    pub fn failed(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            operation,
            message: message.into(),
        }
    }
}
