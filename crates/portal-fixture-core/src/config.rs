//! Fixture configuration
//!
//! Defaults mirror the portal's stock behavior. Every field may be
//! overridden from a TOML file; missing keys keep their defaults.

use crate::error::FixtureError;
use portal_fixture_model::LANGUAGE_NONE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when a row names an author that does not resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorPolicy {
    /// Create the entity without an author and log a warning
    #[default]
    Omit,
    /// Abort the row with an entity-not-found error
    Fail,
}

/// CSS selectors and control names used by the search steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSelectors {
    /// Site-wide dataset search form
    pub form: String,
    /// Text field inside the form
    pub field: String,
    /// Submit button inside the form
    pub submit: String,
    /// Region listing search results
    pub results: String,
    /// One result row
    pub row: String,
    /// Title element inside a result row
    pub title: String,
}

impl Default for SearchSelectors {
    fn default() -> Self {
        Self {
            form: "#dkan-sitewide-dataset-search-form--2".to_string(),
            field: "search".to_string(),
            submit: "edit-submit--2".to_string(),
            results: ".view-dkan-datasets".to_string(),
            row: ".views-row".to_string(),
            title: "h2".to_string(),
        }
    }
}

/// Fixture configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Moderation state applied when a row names none
    pub default_moderation_state: String,
    /// Handling of unresolvable authors
    pub author_policy: AuthorPolicy,
    /// Language written to datasets and resources that name none
    pub default_language: String,
    /// Prefix of entity detail urls; the entity id is appended
    pub page_url_prefix: String,
    /// Base url navigation steps prepend to page urls
    pub base_url: String,
    /// Search step selectors
    pub search: SearchSelectors,
}

impl FixtureConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`FixtureError::Config`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FixtureError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`FixtureError::Config`] on invalid TOML or unknown values.
    pub fn from_toml_str(text: &str) -> Result<Self, FixtureError> {
        toml::from_str(text).map_err(|e| FixtureError::Config(e.to_string()))
    }

    /// With author policy
    #[inline]
    #[must_use]
    pub fn with_author_policy(mut self, policy: AuthorPolicy) -> Self {
        self.author_policy = policy;
        self
    }

    /// With default moderation state
    #[inline]
    #[must_use]
    pub fn with_default_moderation_state(mut self, state: impl Into<String>) -> Self {
        self.default_moderation_state = state.into();
        self
    }

    /// With base url
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Detail url of an entity
    #[must_use]
    pub fn entity_url(&self, id: portal_fixture_model::EntityId) -> String {
        format!("{}{}", self.page_url_prefix, id)
    }

    /// Absolute url of a site-relative path
    #[must_use]
    pub fn locate_path(&self, path: &str) -> String {
        if self.base_url.is_empty() || path.contains("://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            default_moderation_state: "draft".to_string(),
            author_policy: AuthorPolicy::Omit,
            default_language: LANGUAGE_NONE.to_string(),
            page_url_prefix: "/node/".to_string(),
            base_url: String::new(),
            search: SearchSelectors::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_fixture_model::EntityId;

    #[test]
    fn defaults() {
        let config = FixtureConfig::new();
        assert_eq!(config.default_moderation_state, "draft");
        assert_eq!(config.author_policy, AuthorPolicy::Omit);
        assert_eq!(config.default_language, "und");
        assert_eq!(config.entity_url(EntityId::new(12)), "/node/12");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = FixtureConfig::from_toml_str(
            r#"
            author_policy = "fail"
            base_url = "http://portal.test/"

            [search]
            title = "h3"
            "#,
        )
        .unwrap();

        assert_eq!(config.author_policy, AuthorPolicy::Fail);
        assert_eq!(config.default_moderation_state, "draft");
        assert_eq!(config.search.title, "h3");
        assert_eq!(config.search.row, ".views-row");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = FixtureConfig::from_toml_str("author_policy = \"maybe\"").unwrap_err();
        assert!(matches!(err, FixtureError::Config(_)));
    }

    #[test]
    fn locate_path_joins_base() {
        let config = FixtureConfig::new().with_base_url("http://portal.test/");
        assert_eq!(config.locate_path("/node/3"), "http://portal.test/node/3");
        assert_eq!(FixtureConfig::new().locate_path("/node/3"), "/node/3");
        assert_eq!(config.locate_path("https://elsewhere/x"), "https://elsewhere/x");
    }
}
