use crate::backend::BrowserSession;
use crate::config::SearchSelectors;
use crate::error::BackendError;
use portal_fixture_registry::EntityRegistry;
use std::collections::HashMap;

/// A page as the in-memory session renders it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    pub status: u16,
    /// Match counts per selector
    pub regions: HashMap<String, usize>,
    /// Result row titles, shown inside the results region
    pub rows: Vec<String>,
}

impl RenderedPage {
    #[must_use]
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_region(mut self, selector: &str, count: usize) -> Self {
        self.regions.insert(selector.to_string(), count);
        self
    }
}

/// Browser session over a fixed route table and a dataset search index
///
/// Unknown urls render as 404. Every served page carries the search form.
/// Absolute urls under the configured base resolve to their site path.
#[derive(Debug)]
pub struct InMemorySession {
    selectors: SearchSelectors,
    base_url: String,
    routes: HashMap<String, RenderedPage>,
    search_index: Vec<String>,
    current: Option<RenderedPage>,
    reports_status: bool,
    history: Vec<String>,
}

impl InMemorySession {
    #[must_use]
    pub fn new(selectors: SearchSelectors) -> Self {
        Self {
            selectors,
            base_url: String::new(),
            routes: HashMap::new(),
            search_index: Vec::new(),
            current: None,
            reports_status: true,
            history: Vec::new(),
        }
    }

    /// Serve routes under `base_url` as well as site-relative
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Behave like a driver that cannot observe status codes
    #[must_use]
    pub fn without_status_codes(mut self) -> Self {
        self.reports_status = false;
        self
    }

    /// Serve `url` with `page`
    pub fn route(&mut self, url: impl Into<String>, page: RenderedPage) {
        self.routes.insert(url.into(), page);
    }

    /// Serve every registered page and index every registered dataset
    pub fn serve_registry(&mut self, registry: &EntityRegistry) {
        for page in registry.pages() {
            let rendered = RenderedPage::with_status(200).with_region(&self.selectors.form, 1);
            self.routes.insert(page.url.clone(), rendered);
        }
        self.search_index = registry
            .datasets()
            .iter()
            .map(|dataset| dataset.title.clone())
            .collect();
    }

    /// Urls visited, in order
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl BrowserSession for InMemorySession {
    fn visit(&mut self, url: &str) -> Result<(), BackendError> {
        self.history.push(url.to_string());
        let path = match url.strip_prefix(self.base_url.as_str()) {
            Some(rest) if !self.base_url.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                if rest.is_empty() {
                    "/"
                } else {
                    rest
                }
            }
            _ => url,
        };
        let page = self
            .routes
            .get(path)
            .cloned()
            .unwrap_or_else(|| RenderedPage::with_status(404));
        self.current = Some(page);
        Ok(())
    }

    fn status_code(&self) -> Result<u16, BackendError> {
        if !self.reports_status {
            return Err(BackendError::Unsupported("status_code"));
        }
        self.current
            .as_ref()
            .map(|page| page.status)
            .ok_or_else(|| BackendError::failed("status_code", "no page has been visited"))
    }

    fn count(&self, selector: &str) -> usize {
        self.current
            .as_ref()
            .and_then(|page| page.regions.get(selector).copied())
            .unwrap_or(0)
    }

    fn submit_form(
        &mut self,
        form: &str,
        field: &str,
        value: &str,
        _button: &str,
    ) -> Result<(), BackendError> {
        if self.count(form) != 1 {
            return Err(BackendError::failed(
                "submit_form",
                format!("form '{form}' is not on the page"),
            ));
        }
        tracing::trace!(form, field, value, "form submitted");

        let needle = value.to_lowercase();
        let rows = self
            .search_index
            .iter()
            .filter(|title| title.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let mut results = RenderedPage::with_status(200)
            .with_region(&self.selectors.form, 1)
            .with_region(&self.selectors.results, 1);
        results.rows = rows;
        self.current = Some(results);
        Ok(())
    }

    fn texts(&self, region: &str, _row: &str, _element: &str) -> Vec<String> {
        match &self.current {
            Some(page) if page.regions.contains_key(region) => page.rows.clone(),
            _ => Vec::new(),
        }
    }
}
