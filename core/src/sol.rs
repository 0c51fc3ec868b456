//! Statute-of-limitations evaluator.
//!
//! Every per-row outcome is explicit: a verdict, a documented skip, or
//! an error. [`outside_sol`] collapses all of them to the report's
//! boolean, where only [`SolVerdict::Expired`] is `true`.

use crate::rules::{RuleIndex, SolTerm};
use chrono::{DateTime, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum SolVerdict {
    /// Today is strictly after the cutoff.
    Expired { cutoff: NaiveDate },
    Within { cutoff: NaiveDate },
    NotApplicable { reason: SolSkip },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolSkip {
    /// No SOL duration column in the rule table.
    Disabled,
    UnknownJurisdiction,
    /// The jurisdiction's SOL cell is empty.
    NoRule,
    /// Missing or unparseable placement date.
    MissingPlacementDate,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolError {
    #[error("SOL term '{text}' for {jurisdiction} has no usable year count")]
    UnparseableTerm { jurisdiction: String, text: String },

    #[error("{placement} + {years} years is out of the representable date range")]
    CutoffOutOfRange { placement: NaiveDate, years: u32 },
}

pub type SolOutcome = Result<SolVerdict, SolError>;

/// Calendar-year offset. Feb 29 lands on Feb 28 in a common year.
pub fn sol_cutoff(placement: NaiveDate, years: u32) -> Option<NaiveDate> {
    let months = years.checked_mul(12)?;
    placement.checked_add_months(Months::new(months))
}

pub fn evaluate_sol(
    jurisdiction: Option<&str>,
    placement: Option<NaiveDate>,
    today: NaiveDate,
    rules: &RuleIndex,
) -> SolOutcome {
    let skip = |reason| Ok(SolVerdict::NotApplicable { reason });

    if !rules.sol_enabled() {
        return skip(SolSkip::Disabled);
    }
    let Some(jurisdiction) = jurisdiction.filter(|j| rules.is_known(j)) else {
        return skip(SolSkip::UnknownJurisdiction);
    };
    let years = match rules.sol_term(jurisdiction) {
        None => return skip(SolSkip::NoRule),
        Some(SolTerm::Years(years)) => *years,
        Some(SolTerm::Unparseable(text)) => {
            return Err(SolError::UnparseableTerm {
                jurisdiction: jurisdiction.to_string(),
                text: text.clone(),
            })
        }
    };
    let Some(placement) = placement else {
        return skip(SolSkip::MissingPlacementDate);
    };

    let cutoff = sol_cutoff(placement, years)
        .ok_or(SolError::CutoffOutOfRange { placement, years })?;
    if today > cutoff {
        Ok(SolVerdict::Expired { cutoff })
    } else {
        Ok(SolVerdict::Within { cutoff })
    }
}

/// Report value for an outcome. Skips and errors read as "not outside SOL".
pub fn outside_sol(outcome: &SolOutcome) -> bool {
    matches!(outcome, Ok(SolVerdict::Expired { .. }))
}

/// Parse a placement date cell against `formats` in order.
/// RFC 3339 timestamps are accepted as well. Blank or unmatched text is `None`.
pub fn parse_placement_date(text: &str, formats: &[String]) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::{default_date_formats, RuleColumns}, table::Table};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rules(csv: &str) -> RuleIndex {
        let table = Table::from_csv_reader(csv.as_bytes()).unwrap();
        RuleIndex::build(&table, &RuleColumns::default()).unwrap()
    }

    fn texas() -> RuleIndex {
        rules("State,License Required,SOL Written Contract\nTexas,No,4 years\nIowa,No,varies\nOhio,No,\n")
    }

    #[test]
    fn cutoff_keeps_month_and_day() {
        assert_eq!(sol_cutoff(date(2018, 1, 1), 4), Some(date(2022, 1, 1)));
        assert_eq!(sol_cutoff(date(2019, 7, 31), 0), Some(date(2019, 7, 31)));
    }

    #[test]
    fn leap_day_clamps_to_feb_28() {
        assert_eq!(sol_cutoff(date(2020, 2, 29), 1), Some(date(2021, 2, 28)));
        assert_eq!(sol_cutoff(date(2020, 2, 29), 4), Some(date(2024, 2, 29)));
    }

    #[test]
    fn cutoff_overflow_is_none() {
        assert_eq!(sol_cutoff(date(2020, 1, 1), u32::MAX), None);
        assert_eq!(sol_cutoff(date(2020, 1, 1), 400_000), None);
    }

    #[test]
    fn expired_only_strictly_after_cutoff() {
        let rules = texas();
        let placed = Some(date(2020, 3, 15));
        let on_cutoff = evaluate_sol(Some("Texas"), placed, date(2024, 3, 15), &rules);
        assert_eq!(on_cutoff, Ok(SolVerdict::Within { cutoff: date(2024, 3, 15) }));
        let day_after = evaluate_sol(Some("Texas"), placed, date(2024, 3, 16), &rules);
        assert_eq!(day_after, Ok(SolVerdict::Expired { cutoff: date(2024, 3, 15) }));
        assert!(outside_sol(&day_after));
        assert!(!outside_sol(&on_cutoff));
    }

    #[test]
    fn skips_are_distinguishable_from_failures() {
        let rules = texas();
        let today = date(2024, 1, 1);
        let placed = Some(date(2000, 1, 1));

        assert_eq!(
            evaluate_sol(None, placed, today, &rules),
            Ok(SolVerdict::NotApplicable { reason: SolSkip::UnknownJurisdiction })
        );
        assert_eq!(
            evaluate_sol(Some("Ohio"), placed, today, &rules),
            Ok(SolVerdict::NotApplicable { reason: SolSkip::NoRule })
        );
        assert_eq!(
            evaluate_sol(Some("Texas"), None, today, &rules),
            Ok(SolVerdict::NotApplicable { reason: SolSkip::MissingPlacementDate })
        );
        let failed = evaluate_sol(Some("Iowa"), placed, today, &rules);
        assert!(matches!(failed, Err(SolError::UnparseableTerm { .. })));
        assert!(!outside_sol(&failed));
    }

    #[test]
    fn disabled_when_no_sol_column() {
        let rules = rules("State,License Required\nTexas,No\n");
        let outcome = evaluate_sol(Some("Texas"), Some(date(1990, 1, 1)), date(2024, 1, 1), &rules);
        assert_eq!(outcome, Ok(SolVerdict::NotApplicable { reason: SolSkip::Disabled }));
    }

    #[test]
    fn parses_common_placement_formats() {
        let formats = default_date_formats();
        let expected = Some(date(2018, 1, 5));
        for text in [
            "2018-01-05",
            "2018/01/05",
            "01/05/2018",
            "1/5/2018",
            "01/05/18",
            "01-05-2018",
            "2018-01-05 00:00:00",
            "2018-01-05T13:45:00",
            "2018-01-05T13:45:00-05:00",
            " 2018-01-05 ",
        ] {
            assert_eq!(parse_placement_date(text, &formats), expected, "format: {text}");
        }
    }

    #[test]
    fn unparseable_placement_dates_are_none() {
        let formats = default_date_formats();
        for text in ["", "   ", "not a date", "2018-02-30", "13/45/2018"] {
            assert_eq!(parse_placement_date(text, &formats), None, "text: {text}");
        }
    }
}
