//! Rule index — the "Licensing" table keyed by full jurisdiction name.
//!
//! Built once per run. Rows with an empty `State` are dropped; when a
//! jurisdiction appears twice the later row wins.

use crate::{
    config::RuleColumns,
    error::CheckResult,
    table::Table,
    types::JurisdictionName,
};
use std::collections::HashMap;

/// Returned by [`RuleIndex::license_required`] for jurisdictions with no rule row.
pub const UNKNOWN_LICENSE_TEXT: &str = "Unknown";

/// Picks the SOL duration column by header substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolColumnSelector {
    markers: Vec<String>,
}

impl SolColumnSelector {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    /// First header containing every marker, case-sensitive.
    /// An empty marker list matches nothing.
    pub fn select<'a>(&self, headers: &'a [String]) -> Option<(usize, &'a str)> {
        if self.markers.is_empty() {
            return None;
        }
        headers
            .iter()
            .enumerate()
            .find(|(_, h)| self.markers.iter().all(|m| h.contains(m.as_str())))
            .map(|(i, h)| (i, h.as_str()))
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for SolColumnSelector {
    fn default() -> Self {
        Self::new(RuleColumns::default().sol_markers)
    }
}

/// The SOL duration recorded for one jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolTerm {
    Years(u32),
    /// Non-empty text with no usable number, kept verbatim for reporting.
    Unparseable(String),
}

impl SolTerm {
    /// Reads the first run of ASCII digits: `"4 years"` is 4, `"3-6 yrs"` is 3.
    pub fn parse(text: &str) -> Self {
        let digits: String = text
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        match digits.parse::<u32>() {
            Ok(years) => Self::Years(years),
            Err(_) => Self::Unparseable(text.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct RuleRow {
    license_required: String,
    sol: Option<SolTerm>,
}

#[derive(Debug, Clone)]
pub struct RuleIndex {
    rules:      HashMap<JurisdictionName, RuleRow>,
    sol_column: Option<String>,
}

impl RuleIndex {
    /// Index a rule table. Fails only when `State` or `License Required`
    /// is absent from the header row.
    pub fn build(table: &Table, columns: &RuleColumns) -> CheckResult<Self> {
        let state_col = table.require_column("rule", &columns.state)?;
        let license_col = table.require_column("rule", &columns.license_required)?;

        let selector = SolColumnSelector::new(columns.sol_markers.clone());
        let sol = selector.select(table.headers());
        match sol {
            Some((_, name)) => log::debug!("rules: SOL duration column is '{name}'"),
            None => log::warn!(
                "rules: no column contains all of {:?}; SOL checks disabled for this run",
                selector.markers()
            ),
        }

        let mut rules = HashMap::new();
        for row in 0..table.len() {
            let Some(state) = table.cell(row, state_col) else {
                continue;
            };
            let license_required = table.cell(row, license_col).unwrap_or_default().to_string();
            let sol_term = sol.and_then(|(col, _)| table.cell(row, col)).map(SolTerm::parse);
            if rules
                .insert(state.to_string(), RuleRow { license_required, sol: sol_term })
                .is_some()
            {
                log::debug!("rules: duplicate row for '{state}', keeping the later one");
            }
        }

        log::debug!("rules: indexed {} jurisdictions", rules.len());
        Ok(Self {
            rules,
            sol_column: sol.map(|(_, name)| name.to_string()),
        })
    }

    pub fn is_known(&self, jurisdiction: &str) -> bool {
        self.rules.contains_key(jurisdiction)
    }

    /// Sorted names of every indexed jurisdiction.
    pub fn known_jurisdictions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The raw "License Required" text, or `"Unknown"` when not indexed.
    pub fn license_required(&self, jurisdiction: &str) -> &str {
        self.rules
            .get(jurisdiction)
            .map(|r| r.license_required.as_str())
            .unwrap_or(UNKNOWN_LICENSE_TEXT)
    }

    pub fn sol_term(&self, jurisdiction: &str) -> Option<&SolTerm> {
        self.rules.get(jurisdiction).and_then(|r| r.sol.as_ref())
    }

    pub fn sol_years(&self, jurisdiction: &str) -> Option<u32> {
        match self.sol_term(jurisdiction) {
            Some(SolTerm::Years(years)) => Some(*years),
            _ => None,
        }
    }

    /// Header of the detected SOL duration column. `None` disables SOL checks.
    pub fn sol_column(&self) -> Option<&str> {
        self.sol_column.as_deref()
    }

    pub fn sol_enabled(&self) -> bool {
        self.sol_column.is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
