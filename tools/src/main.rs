//! placement-check: headless runner for the placement rule checker.
//!
//! Usage:
//!   placement-check --placements PLACEMENTV2.csv --rules Licensing.csv --licensed CA,TX
//!   placement-check --placements p.csv --rules r.csv --status Violation --debt-type Medical
//!   placement-check --placements p.csv --rules r.csv --ipc-mode

use anyhow::{Context, Result};
use chrono::NaiveDate;
use placement_core::{
    clock::EvaluationClock,
    config::CheckerConfig,
    engine::PlacementCheck,
    report::{AnnotatedTable, ReportFilter, StatusFilter, Summary},
    table::Table,
    ComplianceStatus,
};
use std::collections::BTreeSet;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    SetLicensed {
        states: Vec<String>,
    },
    SetFilter {
        #[serde(default)]
        debt_types: BTreeSet<String>,
        #[serde(default)]
        status: Option<String>,
    },
    Export {
        dir: Option<String>,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    summary: Summary,
    known_jurisdictions: Vec<&'a str>,
    licensed: Vec<&'a str>,
    debt_type_options: Vec<&'a str>,
    status_options: Vec<&'static str>,
    filter: &'a ReportFilter,
    headers: &'a [String],
    rows: Vec<&'a [String]>,
    sol_column: Option<&'a str>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let placements = string_arg(&args, "--placements")
        .context("missing --placements <csv>")?;
    let rules = string_arg(&args, "--rules").context("missing --rules <csv>")?;
    let out_dir = string_arg(&args, "--out").unwrap_or(".");

    let mut config = match string_arg(&args, "--config") {
        Some(path) => CheckerConfig::load(path)?,
        None => CheckerConfig::default(),
    };
    if let Some(list) = string_arg(&args, "--licensed") {
        config.licensed = split_list(list).collect();
    }

    let clock = match string_arg(&args, "--today") {
        Some(text) => EvaluationClock::fixed(
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .with_context(|| format!("--today expects YYYY-MM-DD, got '{text}'"))?,
        ),
        None => EvaluationClock::System,
    };

    let mut filter = ReportFilter {
        debt_types: string_arg(&args, "--debt-type")
            .map(|list| split_list(list).collect())
            .unwrap_or_default(),
        status: match string_arg(&args, "--status") {
            Some(text) => StatusFilter::parse(text).map_err(anyhow::Error::msg)?,
            None => StatusFilter::All,
        },
    };

    let rule_table = Table::from_csv_path(rules)
        .with_context(|| format!("Cannot read rules {rules}"))?;
    let accounts = Table::from_csv_path(placements)
        .with_context(|| format!("Cannot read placements {placements}"))?;
    let mut check = PlacementCheck::from_rule_table(config, &rule_table)?;

    if !ipc_mode {
        println!("Placement File Rule Checker");
        println!("  placements: {placements}");
        println!("  rules:      {rules}");
        println!("  today:      {}", clock.today());
        println!("  licensed:   {}", join(check.licensed().iter().map(String::as_str)));
        println!();
    }

    if ipc_mode {
        run_ipc_loop(&mut check, &accounts, &clock, &mut filter, out_dir)?;
    } else {
        let table = check.run(&accounts, &clock)?;
        print_summary(&check, &table, &filter);
        let path = write_export(&check, &table, out_dir)?;
        println!();
        println!("  export:     {}", path.display());
    }

    Ok(())
}

fn run_ipc_loop(
    check: &mut PlacementCheck,
    accounts: &Table,
    clock: &EvaluationClock,
    filter: &mut ReportFilter,
    out_dir: &str,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();
    let mut table = check.run(accounts, clock)?;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::SetLicensed { states } => {
                check.set_licensed(states);
                table = check.run(accounts, clock)?;
            }
            IpcCommand::SetFilter { debt_types, status } => {
                let status = match status.as_deref().map(StatusFilter::parse) {
                    None => StatusFilter::All,
                    Some(Ok(s)) => s,
                    Some(Err(e)) => {
                        write_error(&mut stdout, &e)?;
                        continue;
                    }
                };
                *filter = ReportFilter { debt_types, status };
            }
            IpcCommand::Export { dir } => {
                let dir = dir.as_deref().unwrap_or(out_dir);
                if let Err(e) = write_export(check, &table, dir) {
                    write_error(&mut stdout, &format!("{e:#}"))?;
                    continue;
                }
            }
        }

        let state = build_ui_state(check, &table, filter);
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn build_ui_state<'a>(
    check: &'a PlacementCheck,
    table: &'a AnnotatedTable,
    filter: &'a ReportFilter,
) -> UiState<'a> {
    UiState {
        summary: table.summary(),
        known_jurisdictions: check.rules().known_jurisdictions(),
        licensed: check.licensed().iter().map(String::as_str).collect(),
        debt_type_options: table.debt_type_options(),
        status_options: std::iter::once("All")
            .chain(ComplianceStatus::ALL.iter().map(|s| s.label()))
            .collect(),
        filter,
        headers: table.headers(),
        rows: table.filtered(filter).map(|r| r.cells.as_slice()).collect(),
        sol_column: check.rules().sol_column(),
    }
}

fn write_export(check: &PlacementCheck, table: &AnnotatedTable, dir: &str) -> Result<PathBuf> {
    let payload = table.export(&check.config().export_file_name)?;
    let path = Path::new(dir).join(&payload.file_name);
    std::fs::write(&path, &payload.bytes)
        .with_context(|| format!("Cannot write {}", path.display()))?;
    log::info!("export: wrote {} rows to {}", table.rows().len(), path.display());
    Ok(path)
}

fn print_summary(check: &PlacementCheck, table: &AnnotatedTable, filter: &ReportFilter) {
    let Summary { total, pass, fail, outside_sol } = table.summary();
    let diagnostics = table.diagnostics();

    println!("=== SUMMARY ===");
    println!("  accounts:     {total}");
    println!("  pass:         {pass}");
    println!("  fail:         {fail}");
    println!("  outside SOL:  {outside_sol}");
    match check.rules().sol_column() {
        Some(col) => println!("  SOL column:   {col}"),
        None => println!("  SOL column:   (none found, SOL checks disabled)"),
    }
    if !diagnostics.is_clean() {
        println!("  unknown jurisdictions: {}", diagnostics.unknown_jurisdictions);
        println!("  unparseable dates:     {}", diagnostics.unparseable_dates);
        println!("  SOL check failures:    {}", diagnostics.sol_failures);
    }

    println!();
    println!("=== RESULTS ===");
    let status_col = table.derived_columns().status;
    let state_col = table.derived_columns().state_full;
    let mut shown = 0usize;
    for row in table.filtered(filter) {
        println!(
            "  {:<24} {:<20} {}",
            row.cells[state_col],
            row.cells[status_col],
            if row.outside_sol() { "outside SOL" } else { "" },
        );
        shown += 1;
    }
    if shown == 0 {
        println!("  (No rows match the current filter)");
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn split_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<&str> = items.collect();
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}
