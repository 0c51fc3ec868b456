//! The evaluation pass — joins placement rows to the rule index.
//!
//! PER ROW (fixed order, each step reads only the row and the rules):
//!   1. Normalize the two-letter code to a full name
//!   2. Look up the license-required text
//!   3. Classify license status
//!   4. Parse the placement date
//!   5. Evaluate the SOL window
//!
//! RULES:
//!   - The rule index and licensed set are read-only during a pass.
//!   - No row's result depends on any other row.
//!   - Row-level problems never fail the pass; they become `Unknown` or `false`.

use crate::{
    classifier::{classify, ComplianceStatus},
    clock::EvaluationClock,
    config::CheckerConfig,
    error::CheckResult,
    jurisdiction,
    report::{AccountEvaluation, AnnotatedRow, AnnotatedTable, DerivedColumns, RunDiagnostics},
    rules::RuleIndex,
    sol::{evaluate_sol, parse_placement_date},
    table::Table,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Input column positions resolved once per pass.
#[derive(Debug, Clone, Copy)]
struct AccountColumnIndex {
    state:          usize,
    debt_type:      usize,
    placement_date: usize,
}

pub struct PlacementCheck {
    config:   CheckerConfig,
    rules:    RuleIndex,
    licensed: BTreeSet<String>,
}

impl PlacementCheck {
    /// Build with the config's initial licensed set.
    pub fn new(config: CheckerConfig, rules: RuleIndex) -> Self {
        let mut check = Self {
            licensed: BTreeSet::new(),
            rules,
            config,
        };
        let initial = check.config.licensed.clone();
        check.set_licensed(initial);
        check
    }

    /// Index `rule_table` with the config's column names, then build.
    pub fn from_rule_table(config: CheckerConfig, rule_table: &Table) -> CheckResult<Self> {
        let rules = RuleIndex::build(rule_table, &config.rule_columns)?;
        Ok(Self::new(config, rules))
    }

    /// Replace the licensed set. Exact two-letter codes are expanded to
    /// full names; names the rule table does not know are kept but logged.
    pub fn set_licensed<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.licensed = names
            .into_iter()
            .map(|n| {
                let n = n.as_ref().trim();
                jurisdiction::full_name(n).unwrap_or(n).to_string()
            })
            .filter(|n| !n.is_empty())
            .collect();

        for name in self.unmatched_licensed() {
            match jurisdiction::code_for(name) {
                Some(code) => log::warn!(
                    "licensed jurisdiction '{name}' ({code}) has no rule row; it has no effect"
                ),
                None => log::warn!(
                    "licensed '{name}' is neither a jurisdiction code nor a jurisdiction name; it has no effect"
                ),
            }
        }
    }

    /// Licensed entries that can never match: names with no rule row,
    /// including anything that is not a jurisdiction name at all.
    pub fn unmatched_licensed(&self) -> Vec<&str> {
        self.licensed
            .iter()
            .map(String::as_str)
            .filter(|name| !self.rules.is_known(name))
            .collect()
    }

    pub fn licensed(&self) -> &BTreeSet<String> {
        &self.licensed
    }

    pub fn rules(&self) -> &RuleIndex {
        &self.rules
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Evaluate a single account from its raw state code and placement date.
    pub fn evaluate(
        &self,
        state_code: Option<&str>,
        placement: Option<NaiveDate>,
        today: NaiveDate,
    ) -> AccountEvaluation {
        let state_full = state_code.and_then(jurisdiction::full_name);
        let license_required = match state_full {
            Some(name) => self.rules.license_required(name).to_string(),
            None => crate::rules::UNKNOWN_LICENSE_TEXT.to_string(),
        };
        AccountEvaluation {
            state_full,
            license_required,
            status: classify(state_full, &self.licensed, &self.rules),
            sol: evaluate_sol(state_full, placement, today, &self.rules),
        }
    }

    /// Run one full pass over `accounts`.
    ///
    /// Fails only when a required account column is missing.
    pub fn run(&self, accounts: &Table, clock: &EvaluationClock) -> CheckResult<AnnotatedTable> {
        let names = &self.config.account_columns;
        let cols = AccountColumnIndex {
            state:          accounts.require_column("account", &names.state)?,
            debt_type:      accounts.require_column("account", &names.debt_type)?,
            placement_date: accounts.require_column("account", &names.placement_date)?,
        };

        let today = clock.today();
        let (headers, derived) = DerivedColumns::layout(accounts.headers(), &self.config.output_columns);
        let mut diagnostics = RunDiagnostics {
            sol_disabled: !self.rules.sol_enabled(),
            ..RunDiagnostics::default()
        };

        log::debug!("pass: {} accounts, today={today}", accounts.len());

        let mut rows = Vec::with_capacity(accounts.len());
        for (i, input) in accounts.rows().iter().enumerate() {
            let raw_date = accounts.cell(i, cols.placement_date);
            let placement = raw_date.and_then(|d| parse_placement_date(d, &self.config.date_formats));
            if raw_date.is_some() && placement.is_none() {
                diagnostics.unparseable_dates += 1;
            }

            let evaluation = self.evaluate(accounts.raw_cell(i, cols.state), placement, today);
            if evaluation.status == ComplianceStatus::Unknown {
                diagnostics.unknown_jurisdictions += 1;
            }
            if let Err(e) = &evaluation.sol {
                log::debug!("row {i}: SOL check failed, reporting not outside SOL: {e}");
                diagnostics.sol_failures += 1;
            }

            let mut cells = input.clone();
            cells.resize(headers.len(), String::new());
            cells[cols.placement_date] = placement.map(|d| d.to_string()).unwrap_or_default();
            derived.fill(&mut cells, &evaluation);

            rows.push(AnnotatedRow {
                cells,
                debt_type: accounts.raw_cell(i, cols.debt_type).map(str::to_string),
                evaluation,
            });
        }

        let table = AnnotatedTable::new(headers, rows, derived, diagnostics);
        let summary = table.summary();
        log::info!(
            "pass: accounts={} pass={} fail={} outside_sol={}",
            summary.total, summary.pass, summary.fail, summary.outside_sol
        );
        if !diagnostics.is_clean() {
            log::warn!(
                "pass: unknown_jurisdictions={} unparseable_dates={} sol_failures={} sol_disabled={}",
                diagnostics.unknown_jurisdictions,
                diagnostics.unparseable_dates,
                diagnostics.sol_failures,
                diagnostics.sol_disabled
            );
        }
        Ok(table)
    }
}
