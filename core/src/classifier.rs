//! Compliance classifier — one license status per account.

use crate::rules::RuleIndex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComplianceStatus {
    #[serde(rename = "Licensed")]
    Licensed,
    #[serde(rename = "Violation")]
    Violation,
    #[serde(rename = "No license needed")]
    NoLicenseNeeded,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ComplianceStatus {
    pub const ALL: [ComplianceStatus; 4] = [
        Self::Licensed,
        Self::NoLicenseNeeded,
        Self::Violation,
        Self::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Licensed        => "Licensed",
            Self::Violation       => "Violation",
            Self::NoLicenseNeeded => "No license needed",
            Self::Unknown         => "Unknown",
        }
    }

    /// Everything except a violation counts as a pass.
    pub fn is_pass(&self) -> bool {
        !matches!(self, Self::Violation)
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComplianceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown status '{s}'"))
    }
}

/// Classify one account by its full jurisdiction name.
///
/// Order matters: unknown jurisdiction first, then the caller's own
/// licenses, then the rule table. A held license masks any requirement.
pub fn classify(
    jurisdiction: Option<&str>,
    licensed: &BTreeSet<String>,
    rules: &RuleIndex,
) -> ComplianceStatus {
    let Some(jurisdiction) = jurisdiction.filter(|j| rules.is_known(j)) else {
        return ComplianceStatus::Unknown;
    };
    if licensed.contains(jurisdiction) {
        return ComplianceStatus::Licensed;
    }
    if rules.license_required(jurisdiction).to_lowercase().contains("yes") {
        ComplianceStatus::Violation
    } else {
        ComplianceStatus::NoLicenseNeeded
    }
}
