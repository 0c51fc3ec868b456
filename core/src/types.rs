//! Shared primitive types used across the checker.

/// A full jurisdiction name, e.g. "California".
pub type JurisdictionName = String;

/// One row of string cells, aligned with its table's header row.
pub type Row = Vec<String>;
