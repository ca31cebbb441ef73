//! Scenario tables
//!
//! A [`Table`] is the tabular input attached to a scenario step: one header
//! row naming the columns followed by data rows. Rows are handed to the
//! fixture layer as insertion-ordered column → value maps so that error
//! messages and payloads follow the author's column order.

use indexmap::IndexMap;
use serde::Serialize;

/// One data row, keyed by column name in header order
pub type Row = IndexMap<String, String>;

/// Errors building or parsing a scenario table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Table has no header row
    #[error("table has no header row")]
    MissingHeader,

    /// Header names the same column twice
    #[error("duplicate column '{0}' in table header")]
    DuplicateColumn(String),

    /// Row width differs from the header width
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// One-based row (or source line) number
        row: usize,
        /// Header width
        expected: usize,
        /// Cells found on the row
        found: usize,
    },
}

/// Header plus rows, every row exactly as wide as the header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from owned cells
    ///
    /// # Errors
    /// Returns [`TableError`] on an empty or duplicated header, or a ragged row.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        if headers.is_empty() {
            return Err(TableError::MissingHeader);
        }
        for (i, name) in headers.iter().enumerate() {
            if headers[..i].contains(name) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(TableError::Ragged {
                    row: i + 1,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    /// Build a table from string slices
    ///
    /// # Errors
    /// Same as [`Table::new`].
    pub fn from_slices(headers: &[&str], rows: &[&[&str]]) -> Result<Self, TableError> {
        Self::new(
            headers.iter().map(|h| (*h).to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        )
    }

    /// Parse Gherkin-style pipe rows
    ///
    /// The first `|`-delimited line is the header. Blank lines are skipped.
    /// `first_line` is the source line number of the first input line and is
    /// used only for error reporting.
    ///
    /// # Errors
    /// Returns [`TableError`] when the parsed cells do not form a valid table.
    pub fn parse_pipe_rows(text: &str, first_line: usize) -> Result<Self, TableError> {
        let mut headers: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for (offset, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let cells = split_pipe_row(line);
            match &headers {
                None => headers = Some(cells),
                Some(h) if h.len() != cells.len() => {
                    return Err(TableError::Ragged {
                        row: first_line + offset,
                        expected: h.len(),
                        found: cells.len(),
                    });
                }
                Some(_) => rows.push(cells),
            }
        }

        Self::new(headers.ok_or(TableError::MissingHeader)?, rows)
    }

    /// Column names in header order
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows as column → value maps, in table order
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.rows.iter().map(|cells| {
            self.headers
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect()
        })
    }
}

fn split_pipe_row(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(|cell| cell.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn rows_keep_header_order() {
        let table = Table::from_slices(&["title", "author"], &[&["Budget", "alice"]]).unwrap();
        let row = table.rows().next().unwrap();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["title", "author"]);
        assert_eq!(row["author"], "alice");
    }

    #[test]
    fn rejects_ragged_row() {
        let result = Table::from_slices(&["title", "url"], &[&["Home"]]);
        assert_eq!(
            result,
            Err(TableError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn rejects_duplicate_column() {
        let result = Table::from_slices(&["title", "title"], &[]);
        assert_eq!(result, Err(TableError::DuplicateColumn("title".into())));
    }

    #[test]
    fn parses_pipe_rows() {
        let text = "| title | url |\n\n|  Home | /home |\n| About | /about |\n";
        let table = Table::parse_pipe_rows(text, 1).unwrap();
        assert_eq!(table.headers(), &["title".to_string(), "url".to_string()]);
        assert_eq!(table.len(), 2);
        let last = table.rows().last().unwrap();
        assert_eq!(last["url"], "/about");
    }

    #[test]
    fn parse_reports_source_line() {
        let text = "| title | url |\n| Home |\n";
        let err = Table::parse_pipe_rows(text, 10).unwrap_err();
        assert_eq!(
            err,
            TableError::Ragged {
                row: 11,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn empty_cells_survive() {
        let table = Table::parse_pipe_rows("| title | tags |\n| A |  |", 1).unwrap();
        assert_eq!(table.rows().next().unwrap()["tags"], "");
    }

    #[test]
    fn parse_without_rows_is_missing_header() {
        assert_eq!(Table::parse_pipe_rows("\n", 1), Err(TableError::MissingHeader));
    }

    fn pipe_line(cells: &[String], pad: &str) -> String {
        let inner = cells
            .iter()
            .map(|cell| format!("{pad}{cell}{pad}"))
            .collect::<Vec<_>>()
            .join("|");
        format!("|{inner}|")
    }

    proptest! {
        #[test]
        fn prop_pipe_rows_keep_trimmed_cells(
            rows in proptest::collection::vec(
                proptest::collection::vec("[a-z0-9]{1,6}", 3),
                0..6
            ),
            pad in " {0,2}"
        ) {
            let headers: Vec<String> = vec!["title".into(), "author".into(), "tags".into()];
            let mut text = pipe_line(&headers, &pad);
            for cells in &rows {
                text.push('\n');
                text.push_str(&pipe_line(cells, &pad));
            }

            let table = Table::parse_pipe_rows(&text, 1).unwrap();
            prop_assert_eq!(table.headers(), headers.as_slice());
            prop_assert_eq!(table.len(), rows.len());
            for (row, cells) in table.rows().zip(&rows) {
                let values: Vec<&String> = row.values().collect();
                let expected: Vec<&String> = cells.iter().collect();
                prop_assert_eq!(values, expected);
            }
        }
    }
}
