use serde::{Deserialize, Serialize};

/// Column names the checker reads from the placement (account) table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccountColumns {
    pub state: String,
    pub debt_type: String,
    pub placement_date: String,
}

impl Default for AccountColumns {
    fn default() -> Self {
        Self {
            state: "State".into(),
            debt_type: "Debt Type".into(),
            placement_date: "Placement Date".into(),
        }
    }
}

/// Column names read from the "Licensing" rule table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleColumns {
    pub state: String,
    pub license_required: String,
    /// Every marker must appear (case-sensitive) in the SOL duration
    /// column's header. The first header to match wins.
    pub sol_markers: Vec<String>,
}

impl Default for RuleColumns {
    fn default() -> Self {
        Self {
            state: "State".into(),
            license_required: "License Required".into(),
            sol_markers: vec!["SOL".into(), "Written".into()],
        }
    }
}

/// Names of the four derived columns added to the annotated table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputColumns {
    pub state_full: String,
    pub license_required: String,
    pub status: String,
    pub outside_sol: String,
}

impl Default for OutputColumns {
    fn default() -> Self {
        Self {
            state_full: "State_Full".into(),
            license_required: "License Required".into(),
            status: "Status".into(),
            outside_sol: "Outside SOL".into(),
        }
    }
}

pub const DEFAULT_EXPORT_FILE_NAME: &str = "CheckedPlacement.csv";

/// Placement date formats tried in order. Date-time forms keep only the date.
///
/// US month-first forms come first: `%Y` accepts one to four digits, so
/// `"01/05/18"` would otherwise parse as `%Y/%m/%d` in year 1.
pub fn default_date_formats() -> Vec<String> {
    [
        "%m/%d/%y",
        "%m/%d/%Y",
        "%m-%d-%Y",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%m/%d/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckerConfig {
    pub account_columns: AccountColumns,
    pub rule_columns: RuleColumns,
    pub output_columns: OutputColumns,
    pub date_formats: Vec<String>,
    /// Jurisdictions (full names or two-letter codes) held under license
    /// before any interactive re-selection.
    pub licensed: Vec<String>,
    pub export_file_name: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            account_columns: AccountColumns::default(),
            rule_columns: RuleColumns::default(),
            output_columns: OutputColumns::default(),
            date_formats: default_date_formats(),
            licensed: Vec::new(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.into(),
        }
    }
}

impl CheckerConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: CheckerConfig = serde_json::from_str(&content)?;
        if config.rule_columns.sol_markers.is_empty() {
            log::warn!("config {path}: empty sol_markers, SOL checks will be disabled");
        }
        Ok(config)
    }
}
