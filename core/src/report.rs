//! Report assembly — annotated table, summary counts, filters, export.

use crate::{
    classifier::ComplianceStatus,
    config::OutputColumns,
    error::CheckResult,
    sol::SolOutcome,
    types::Row,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

/// Per-account result of one evaluation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountEvaluation {
    pub state_full:       Option<&'static str>,
    pub license_required: String,
    pub status:           ComplianceStatus,
    pub sol:              SolOutcome,
}

impl AccountEvaluation {
    pub fn outside_sol(&self) -> bool {
        crate::sol::outside_sol(&self.sol)
    }
}

/// One annotated account: the output cells plus the typed results behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRow {
    pub cells:      Row,
    pub debt_type:  Option<String>,
    pub evaluation: AccountEvaluation,
}

impl AnnotatedRow {
    pub fn status(&self) -> ComplianceStatus {
        self.evaluation.status
    }

    pub fn outside_sol(&self) -> bool {
        self.evaluation.outside_sol()
    }
}

/// Column positions of the derived fields in the annotated header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedColumns {
    pub state_full:       usize,
    pub license_required: usize,
    pub status:           usize,
    pub outside_sol:      usize,
}

impl DerivedColumns {
    /// Extend `headers` with the derived columns. A derived name that
    /// already exists in the input is overwritten in place.
    pub fn layout(headers: &[String], names: &OutputColumns) -> (Vec<String>, Self) {
        let mut headers = headers.to_vec();
        let mut slot = |name: &str| match headers.iter().position(|h| h == name) {
            Some(i) => i,
            None => {
                headers.push(name.to_string());
                headers.len() - 1
            }
        };
        let columns = Self {
            state_full:       slot(&names.state_full),
            license_required: slot(&names.license_required),
            status:           slot(&names.status),
            outside_sol:      slot(&names.outside_sol),
        };
        (headers, columns)
    }

    /// Write `evaluation` into a row already sized to the annotated headers.
    pub fn fill(&self, cells: &mut Row, evaluation: &AccountEvaluation) {
        cells[self.state_full] = evaluation.state_full.unwrap_or_default().to_string();
        cells[self.license_required] = evaluation.license_required.clone();
        cells[self.status] = evaluation.status.label().to_string();
        cells[self.outside_sol] = bool_cell(evaluation.outside_sol()).to_string();
    }
}

/// Spreadsheet-style boolean text.
pub fn bool_cell(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Summary {
    pub total:       usize,
    pub pass:        usize,
    pub fail:        usize,
    pub outside_sol: usize,
}

/// Row-level problems that were absorbed into safe defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RunDiagnostics {
    /// Codes with no full name, or full names missing from the rule table.
    pub unknown_jurisdictions: usize,
    /// Placement dates that were present but could not be parsed.
    pub unparseable_dates:     usize,
    /// SOL checks that failed and fell back to "not outside SOL".
    pub sol_failures:          usize,
    /// True when no SOL duration column was found.
    pub sol_disabled:          bool,
}

impl RunDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.unknown_jurisdictions == 0
            && self.unparseable_dates == 0
            && self.sol_failures == 0
            && !self.sol_disabled
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "mode", content = "status", rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ComplianceStatus),
}

impl StatusFilter {
    /// `"All"` (any case) clears the filter; anything else must be a status label.
    pub fn parse(text: &str) -> Result<Self, String> {
        if text.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            text.parse().map(Self::Only)
        }
    }

    pub fn matches(&self, status: ComplianceStatus) -> bool {
        match self {
            Self::All      => true,
            Self::Only(s)  => *s == status,
        }
    }
}

/// Conjunctive view filter. An empty debt-type set means no debt-type filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ReportFilter {
    pub debt_types: BTreeSet<String>,
    pub status:     StatusFilter,
}

impl ReportFilter {
    pub fn matches(&self, row: &AnnotatedRow) -> bool {
        let debt_ok = self.debt_types.is_empty()
            || row
                .debt_type
                .as_ref()
                .is_some_and(|d| self.debt_types.contains(d));
        debt_ok && self.status.matches(row.status())
    }
}

/// A finished export: file name, media type and the encoded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name:  String,
    pub media_type: &'static str,
    pub bytes:      Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTable {
    headers:     Vec<String>,
    rows:        Vec<AnnotatedRow>,
    derived:     DerivedColumns,
    diagnostics: RunDiagnostics,
}

impl AnnotatedTable {
    pub fn new(
        headers: Vec<String>,
        rows: Vec<AnnotatedRow>,
        derived: DerivedColumns,
        diagnostics: RunDiagnostics,
    ) -> Self {
        Self { headers, rows, derived, diagnostics }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[AnnotatedRow] {
        &self.rows
    }

    pub fn derived_columns(&self) -> DerivedColumns {
        self.derived
    }

    pub fn diagnostics(&self) -> RunDiagnostics {
        self.diagnostics
    }

    /// Every cell of the named column, in row order.
    pub fn column_values(&self, name: &str) -> Option<Vec<&str>> {
        let col = self.headers.iter().position(|h| h == name)?;
        Some(self.rows.iter().map(|r| r.cells[col].as_str()).collect())
    }

    pub fn summary(&self) -> Summary {
        let pass = self.rows.iter().filter(|r| r.status().is_pass()).count();
        Summary {
            total: self.rows.len(),
            pass,
            fail: self.rows.len() - pass,
            outside_sol: self.rows.iter().filter(|r| r.outside_sol()).count(),
        }
    }

    /// Distinct non-missing debt types, in first-seen order.
    pub fn debt_type_options(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .filter_map(|r| r.debt_type.as_deref())
            .filter(|d| seen.insert(*d))
            .collect()
    }

    pub fn filtered<'a>(&'a self, filter: &'a ReportFilter) -> impl Iterator<Item = &'a AnnotatedRow> + 'a {
        self.rows.iter().filter(move |r| filter.matches(r))
    }

    /// The whole table, unfiltered, as CSV with a header row.
    pub fn to_csv(&self) -> CheckResult<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(&row.cells)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(bytes)
    }

    pub fn export(&self, file_name: &str) -> CheckResult<ExportPayload> {
        Ok(ExportPayload {
            file_name:  file_name.to_string(),
            media_type: EXPORT_MEDIA_TYPE,
            bytes:      self.to_csv()?,
        })
    }
}
