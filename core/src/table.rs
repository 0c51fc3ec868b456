//! In-memory tabular input.
//!
//! RULE: Tables are loaded once per run and never mutated by the
//! evaluation pass. Annotation builds a new table.

use crate::{
    error::{CheckError, CheckResult},
    types::Row,
};
use std::{fs::File, io::Read, path::Path};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows:    Vec<Row>,
}

impl Table {
    /// Build from headers and rows. Every row is padded or truncated
    /// to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Read a CSV document with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> CheckResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Row>, _>>()?;

        Ok(Self::new(headers, rows))
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> CheckResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first header equal to `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Presence check — the only validation applied to input tables.
    pub fn require_column(&self, table: &'static str, name: &str) -> CheckResult<usize> {
        self.column(name).ok_or_else(|| CheckError::MissingColumn {
            table,
            column: name.to_string(),
        })
    }

    /// The cell exactly as read, `None` only when it is empty.
    pub fn raw_cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    /// The cell at (`row`, `col`), `None` when it is missing (empty after trimming).
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}
