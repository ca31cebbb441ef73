//! Page navigation and dataset search steps
//!
//! Pages are addressed by the titles registered during the scenario, either
//! through a `pages:` block or as a side effect of creating an entity.

use crate::backend::BrowserSession;
use crate::config::FixtureConfig;
use crate::error::{BackendError, FixtureError};
use portal_fixture_registry::EntityRegistry;

/// Scenario steps that drive a browser session
pub struct Navigator<'a> {
    config: &'a FixtureConfig,
}

impl<'a> Navigator<'a> {
    /// Create navigator
    #[inline]
    #[must_use]
    pub fn new(config: &'a FixtureConfig) -> Self {
        Self { config }
    }

    /// Visit the page registered under `title` and require a 2XX response
    ///
    /// A driver that cannot report status codes is taken at its word.
    ///
    /// # Errors
    /// - [`FixtureError::PageNotFound`] if no page is registered with `title`
    /// - [`FixtureError::NonSuccessStatus`] for a status outside `200..300`
    pub fn visit_page<S>(
        &self,
        session: &mut S,
        registry: &EntityRegistry,
        title: &str,
    ) -> Result<(), FixtureError>
    where
        S: BrowserSession + ?Sized,
    {
        let page = registry.page(title).ok_or_else(|| FixtureError::PageNotFound {
            title: title.to_string(),
        })?;

        let url = self.config.locate_path(&page.url);
        tracing::debug!(title, %url, "visiting page");
        session.visit(&url)?;

        match session.status_code() {
            Ok(status) if (200..300).contains(&status) => Ok(()),
            Ok(status) => Err(FixtureError::NonSuccessStatus {
                title: title.to_string(),
                url: page.url.clone(),
                status,
            }),
            Err(BackendError::Unsupported(_)) => {
                tracing::debug!(title, "driver cannot report status codes");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Submit `term` through the site-wide dataset search form
    ///
    /// # Errors
    /// - [`FixtureError::RegionNotFound`] if the form or the results region
    ///   is missing
    /// - [`FixtureError::CountMismatch`] if more than one search form matches
    pub fn search_for<S>(&self, session: &mut S, term: &str) -> Result<(), FixtureError>
    where
        S: BrowserSession + ?Sized,
    {
        let search = &self.config.search;
        match session.count(&search.form) {
            0 => {
                return Err(FixtureError::RegionNotFound {
                    selector: search.form.clone(),
                })
            }
            1 => {}
            found => {
                return Err(FixtureError::CountMismatch {
                    selector: search.form.clone(),
                    found,
                })
            }
        }

        tracing::debug!(term, "submitting dataset search");
        session.submit_form(&search.form, &search.field, term, &search.submit)?;

        if session.count(&search.results) == 0 {
            return Err(FixtureError::RegionNotFound {
                selector: search.results.clone(),
            });
        }
        Ok(())
    }

    /// Require a search result whose title is exactly `text`
    ///
    /// # Errors
    /// - [`FixtureError::RegionNotFound`] if the results region is missing
    /// - [`FixtureError::AssertionFailed`] if no row title matches
    pub fn assert_dataset_listed<S>(&self, session: &S, text: &str) -> Result<(), FixtureError>
    where
        S: BrowserSession + ?Sized,
    {
        let search = &self.config.search;
        if session.count(&search.results) == 0 {
            return Err(FixtureError::RegionNotFound {
                selector: search.results.clone(),
            });
        }

        let titles = session.texts(&search.results, &search.row, &search.title);
        if titles.iter().any(|title| title == text) {
            Ok(())
        } else {
            Err(FixtureError::AssertionFailed {
                text: text.to_string(),
            })
        }
    }
}
