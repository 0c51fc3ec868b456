//! placement-core: licensing and statute-of-limitations checks for
//! debt-placement files.
//!
//! DATA FLOW (one way, one pass):
//!   account rows + rule rows
//!     → jurisdiction::full_name
//!     → classifier::classify / sol::evaluate_sol
//!     → report::AnnotatedTable (summary, filters, export)

pub mod classifier;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod jurisdiction;
pub mod report;
pub mod rules;
pub mod sol;
pub mod table;
pub mod types;

pub use classifier::ComplianceStatus;
pub use clock::EvaluationClock;
pub use config::CheckerConfig;
pub use engine::PlacementCheck;
pub use error::{CheckError, CheckResult};
pub use report::{AnnotatedTable, ExportPayload, ReportFilter, StatusFilter, Summary};
pub use rules::RuleIndex;
pub use table::Table;
