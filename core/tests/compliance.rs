//! License classification tests — status per account and summary counts.

use chrono::NaiveDate;
use placement_core::{
    clock::EvaluationClock, config::CheckerConfig, engine::PlacementCheck, table::Table,
    ComplianceStatus,
};

const RULES: &str = "\
State,License Required,SOL - Written Contract,Notes
California,Yes,4 years,
Texas,No,4 years,
New York,YES - collection agency,6,
Ohio,no,6 years,
,Yes,1,orphan row
";

const ACCOUNTS: &str = "\
Account,State,Debt Type,Placement Date,Balance
A-1,CA,Medical,2018-01-01,100.00
A-2,TX,Auto,2023-01-01,250.50
A-3,ZZ,Medical,1990-01-01,10.00
A-4,NY,Credit Card,2010-06-15,75.25
A-5,OH,Auto,not a date,5.00
A-6,NV,Medical,2001-01-01,1.00
A-7,,Auto,2001-01-01,2.00
";

fn today() -> EvaluationClock {
    EvaluationClock::fixed(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
}

fn check_with(licensed: &[&str]) -> PlacementCheck {
    let rules = Table::from_csv_reader(RULES.as_bytes()).expect("rules");
    let mut check = PlacementCheck::from_rule_table(CheckerConfig::default(), &rules).expect("index");
    check.set_licensed(licensed.iter().copied());
    check
}

fn accounts() -> Table {
    Table::from_csv_reader(ACCOUNTS.as_bytes()).expect("accounts")
}

fn statuses(licensed: &[&str]) -> Vec<ComplianceStatus> {
    check_with(licensed)
        .run(&accounts(), &today())
        .expect("run")
        .rows()
        .iter()
        .map(|r| r.status())
        .collect()
}

/// A jurisdiction whose rule text contains "yes" is a violation unless licensed.
#[test]
fn required_license_without_coverage_is_a_violation() {
    let s = statuses(&[]);
    assert_eq!(s[0], ComplianceStatus::Violation, "CA requires a license");
    assert_eq!(s[1], ComplianceStatus::NoLicenseNeeded, "TX does not");
    assert_eq!(s[3], ComplianceStatus::Violation, "NY text contains YES");
    assert_eq!(s[4], ComplianceStatus::NoLicenseNeeded);
}

/// A declared license wins over the rule table, codes and names alike.
#[test]
fn held_license_masks_the_violation() {
    let s = statuses(&["California"]);
    assert_eq!(s[0], ComplianceStatus::Licensed);
    assert_eq!(s[3], ComplianceStatus::Violation, "only California is covered");

    let s = statuses(&["California", "NY", "Texas"]);
    assert_eq!(s[0], ComplianceStatus::Licensed);
    assert_eq!(s[1], ComplianceStatus::Licensed);
    assert_eq!(s[3], ComplianceStatus::Licensed);
}

/// Unmapped codes, states without rule rows and blank codes are all Unknown and never outside SOL.
#[test]
fn unknown_codes_and_unindexed_states_are_unknown() {
    let table = check_with(&["Nevada"]).run(&accounts(), &today()).unwrap();
    for i in [2, 5, 6] {
        let row = &table.rows()[i];
        assert_eq!(row.status(), ComplianceStatus::Unknown, "row {i}");
        assert!(!row.outside_sol(), "row {i} must never be outside SOL");
    }
    // ZZ has no full name at all; NV maps but has no rule row.
    assert_eq!(table.rows()[2].evaluation.state_full, None);
    assert_eq!(table.rows()[5].evaluation.state_full, Some("Nevada"));
    assert_eq!(table.rows()[5].evaluation.license_required, "Unknown");
    assert_eq!(table.diagnostics().unknown_jurisdictions, 3);
}

/// Lowercase or padded codes are not in the table, so they stay Unknown.
#[test]
fn codes_must_match_exactly() {
    let accounts = "\
State,Debt Type,Placement Date
ca,Medical,2018-01-01
\" CA \",Medical,2018-01-01
CA,Medical,2018-01-01
";
    let accounts = Table::from_csv_reader(accounts.as_bytes()).unwrap();
    let table = check_with(&[]).run(&accounts, &today()).unwrap();
    for i in [0, 1] {
        let row = &table.rows()[i];
        assert_eq!(row.evaluation.state_full, None, "row {i}");
        assert_eq!(row.status(), ComplianceStatus::Unknown, "row {i}");
        assert!(!row.outside_sol(), "row {i}");
    }
    assert_eq!(table.rows()[2].status(), ComplianceStatus::Violation);
    assert!(table.rows()[2].outside_sol());
}

/// Each row carries exactly one status, and pass + fail always equals total.
#[test]
fn every_row_gets_exactly_one_status_and_counts_balance() {
    for licensed in [&[][..], &["California"][..], &["California", "New York"][..]] {
        let table = check_with(licensed).run(&accounts(), &today()).unwrap();
        let summary = table.summary();
        assert_eq!(summary.total, 7);
        assert_eq!(summary.pass + summary.fail, summary.total);
        let per_status: usize = ComplianceStatus::ALL
            .iter()
            .map(|s| table.rows().iter().filter(|r| r.status() == *s).count())
            .sum();
        assert_eq!(per_status, summary.total);
    }
}

/// Two passes over the same inputs produce identical tables.
#[test]
fn repeated_passes_are_identical() {
    let check = check_with(&["Texas"]);
    let accounts = accounts();
    let first = check.run(&accounts, &today()).unwrap();
    let second = check.run(&accounts, &today()).unwrap();
    assert_eq!(first, second);
}

/// Changing the licensed set between passes re-evaluates every row.
#[test]
fn relicensing_between_passes_reclassifies_everything() {
    let mut check = check_with(&[]);
    let accounts = accounts();
    assert_eq!(check.run(&accounts, &today()).unwrap().summary().fail, 2);

    check.set_licensed(["CA", "NY"]);
    assert_eq!(check.run(&accounts, &today()).unwrap().summary().fail, 0);

    check.set_licensed(Vec::<String>::new());
    assert_eq!(check.run(&accounts, &today()).unwrap().summary().fail, 2);
}

/// The licensed-set choices are exactly the non-blank rule states, sorted.
#[test]
fn known_jurisdictions_come_from_rule_rows() {
    let check = check_with(&[]);
    assert_eq!(
        check.rules().known_jurisdictions(),
        vec!["California", "New York", "Ohio", "Texas"]
    );
}
