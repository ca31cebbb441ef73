//! Scenario files
//!
//! Reads the fixture blocks out of Gherkin-style feature text and runs them
//! in file order against a portal backend.
//!
//! A block opens on a line `[Given|And] <name>:` and collects the `|` lines
//! that follow. Blank lines and `#` comments are ignored; any other line
//! closes the block. Feature, scenario and tag lines are skipped, and so are
//! `When`/`Then`/`But`/`*` steps together with any table they carry.

use crate::backend::PortalBackend;
use crate::builder::FixtureBuilder;
use crate::config::FixtureConfig;
use crate::error::FixtureError;
use portal_fixture_model::{FixtureKind, Table};
use portal_fixture_registry::EntityRegistry;

const STRUCTURAL_KEYWORDS: &[&str] = &[
    "Feature:",
    "Background:",
    "Scenario:",
    "Scenario Outline:",
    "Examples:",
    "Rule:",
];

const BLOCK_KEYWORDS: &[&str] = &["Given ", "And "];

const STEP_KEYWORDS: &[&str] = &["When ", "Then ", "But ", "* "];

/// Fixture kind named by a block heading
#[must_use]
pub fn block_kind(name: &str) -> Option<FixtureKind> {
    match name {
        "pages" => Some(FixtureKind::Page),
        "groups" => Some(FixtureKind::Group),
        "group memberships" => Some(FixtureKind::GroupMembership),
        "datasets" => Some(FixtureKind::Dataset),
        "resources" => Some(FixtureKind::Resource),
        _ => None,
    }
}

/// One fixture block and its table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioBlock {
    pub kind: FixtureKind,
    /// Line of the block heading
    pub line: usize,
    pub table: Table,
}

/// Fixture blocks of a feature file, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feature {
    pub blocks: Vec<ScenarioBlock>,
    /// Step lines that are not fixture blocks
    pub skipped_steps: usize,
}

impl Feature {
    /// Parse feature text
    ///
    /// # Errors
    /// - [`FixtureError::UnknownBlock`] for a heading that names no fixture kind
    /// - [`FixtureError::Table`] for a block whose table is missing or ragged
    pub fn parse(text: &str) -> Result<Self, FixtureError> {
        let mut feature = Self::default();
        let mut open: Option<OpenBlock> = None;

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') {
                // Keep line offsets inside a table stable.
                if let Some(block) = open.as_mut() {
                    block.push_blank();
                }
                continue;
            }

            if line.starts_with('|') {
                if let Some(block) = open.as_mut() {
                    block.push_row(line_no, line);
                }
                continue;
            }

            if let Some(block) = open.take() {
                feature.blocks.push(block.finish()?);
            }

            if line.starts_with('@') || STRUCTURAL_KEYWORDS.iter().any(|k| line.starts_with(k)) {
                continue;
            }

            match heading(line) {
                Some(name) => {
                    let kind = block_kind(&name).ok_or(FixtureError::UnknownBlock {
                        line: line_no,
                        name,
                    })?;
                    open = Some(OpenBlock::new(kind, line_no));
                }
                None => feature.skipped_steps += 1,
            }
        }

        if let Some(block) = open.take() {
            feature.blocks.push(block.finish()?);
        }
        Ok(feature)
    }

    /// Total data rows across all blocks
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.blocks.iter().map(|block| block.table.len()).sum()
    }
}

fn heading(line: &str) -> Option<String> {
    if STEP_KEYWORDS.iter().any(|keyword| line.starts_with(keyword)) {
        return None;
    }
    let body = BLOCK_KEYWORDS
        .iter()
        .find_map(|keyword| line.strip_prefix(keyword))
        .unwrap_or(line);
    let name = body.strip_suffix(':')?;
    Some(name.trim().to_lowercase())
}

struct OpenBlock {
    kind: FixtureKind,
    line: usize,
    first_row: Option<usize>,
    text: String,
}

impl OpenBlock {
    fn new(kind: FixtureKind, line: usize) -> Self {
        Self {
            kind,
            line,
            first_row: None,
            text: String::new(),
        }
    }

    fn push_row(&mut self, line_no: usize, line: &str) {
        self.first_row.get_or_insert(line_no);
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn push_blank(&mut self) {
        if self.first_row.is_some() {
            self.text.push('\n');
        }
    }

    fn finish(self) -> Result<ScenarioBlock, FixtureError> {
        let table = Table::parse_pipe_rows(&self.text, self.first_row.unwrap_or(self.line))?;
        Ok(ScenarioBlock {
            kind: self.kind,
            line: self.line,
            table,
        })
    }
}

/// Totals of a scenario run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub blocks: usize,
    pub rows: usize,
}

/// Runs fixture blocks and owns the scenario registry
#[derive(Debug, Default)]
pub struct ScenarioRunner {
    config: FixtureConfig,
    registry: EntityRegistry,
}

impl ScenarioRunner {
    /// Create runner with an empty registry
    #[must_use]
    pub fn new(config: FixtureConfig) -> Self {
        Self {
            config,
            registry: EntityRegistry::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    #[must_use]
    pub fn into_registry(self) -> EntityRegistry {
        self.registry
    }

    /// Apply one block
    ///
    /// # Errors
    /// Propagates the first failing row.
    pub fn run_block<B>(&mut self, backend: &mut B, block: &ScenarioBlock) -> Result<usize, FixtureError>
    where
        B: PortalBackend + ?Sized,
    {
        FixtureBuilder::new(backend, &self.config).add_block(&mut self.registry, block.kind, &block.table)
    }

    /// Apply every block in file order, stopping at the first failure
    ///
    /// # Errors
    /// Propagates the first failing row; earlier blocks stay applied.
    pub fn run<B>(&mut self, backend: &mut B, feature: &Feature) -> Result<RunSummary, FixtureError>
    where
        B: PortalBackend + ?Sized,
    {
        let mut summary = RunSummary::default();
        for block in &feature.blocks {
            match self.run_block(backend, block) {
                Ok(rows) => {
                    summary.blocks += 1;
                    summary.rows += rows;
                }
                Err(e) => {
                    tracing::error!(kind = %block.kind, line = block.line, error = %e, "fixture block failed");
                    return Err(e);
                }
            }
        }
        Ok(summary)
    }
}
