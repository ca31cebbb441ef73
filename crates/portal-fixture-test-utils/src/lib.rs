//! Testing utilities for the portal fixtures workspace
//!
//! Shared tables, seeded portals and scenario helpers.

#![allow(missing_docs)]

use portal_fixture_core::test_harness::{InMemoryPortal, InMemorySession};
use portal_fixture_core::{FixtureBuilder, FixtureConfig, FixtureError};
use portal_fixture_model::Table;
use portal_fixture_registry::EntityRegistry;

pub fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    Table::from_slices(headers, rows).unwrap()
}

/// Portal with the named accounts, ids assigned in order from 1
pub fn seeded_portal(accounts: &[&str]) -> InMemoryPortal {
    accounts
        .iter()
        .fold(InMemoryPortal::new(), |portal, name| portal.with_account(name))
}

/// Session serving every page in `registry`
pub fn session_for(registry: &EntityRegistry, config: &FixtureConfig) -> InMemorySession {
    let mut session = InMemorySession::new(config.search.clone()).with_base_url(&config.base_url);
    session.serve_registry(registry);
    session
}

/// Create one dataset per title, with no author and the default state
pub fn add_datasets(
    portal: &mut InMemoryPortal,
    registry: &mut EntityRegistry,
    config: &FixtureConfig,
    titles: &[&str],
) -> Result<usize, FixtureError> {
    let rows: Vec<Vec<&str>> = titles.iter().map(|title| vec![*title]).collect();
    let rows: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    FixtureBuilder::new(portal, config).add_datasets(registry, &table(&["title"], &rows))
}

pub const BUDGET_FEATURE: &str = r#"Feature: Budget datasets

  Scenario: Resource linked to dataset
    Given groups:
      | title   | author | published |
      | Finance | alice  | Yes       |
    And group memberships:
      | user | group   | role on group        | membership status |
      | bob  | Finance | administrator member | Active            |
    And datasets:
      | title       | author | tags              | moderation |
      | Budget 2020 | alice  | finance, open data | published  |
    And resources:
      | title       | dataset     | format |
      | Budget File | Budget 2020 | csv    |
    When I am on the "Budget File" page
"#;
