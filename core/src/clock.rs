//! Evaluation clock — supplies "today" for the SOL check.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "mode", content = "date", rename_all = "snake_case")]
pub enum EvaluationClock {
    /// Local wall-clock date, read once per call.
    #[default]
    System,
    /// Pinned date (tests, `--today`, re-running an old report).
    Fixed(NaiveDate),
}

impl EvaluationClock {
    pub fn fixed(date: NaiveDate) -> Self {
        Self::Fixed(date)
    }

    pub fn today(&self) -> NaiveDate {
        match self {
            Self::System   => Local::now().date_naive(),
            Self::Fixed(d) => *d,
        }
    }
}
