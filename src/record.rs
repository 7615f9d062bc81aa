//! Row types: raw timesheet records and their canonical form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names the timesheet export must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Date",
    "First Name",
    "Last Name",
    "Task",
    "Project",
    "Hours",
    "Notes",
];

/// One row as read from the source, before any validation.
///
/// Date and hours stay textual here so that the normalizer can report
/// exactly which value was rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Hours")]
    pub hours: String,
    #[serde(rename = "Notes", default)]
    pub notes: Option<String>,
    /// 1-based line number in the source file, for diagnostics.
    #[serde(skip)]
    pub line: u64,
}

/// A validated row with derived fields, shared by every report pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Week")]
    pub week_start: NaiveDate,
    #[serde(rename = "Full Name")]
    pub full_name: String,
    #[serde(rename = "Task")]
    pub task: String,
    #[serde(rename = "Project")]
    pub project: String,
    #[serde(rename = "Hours")]
    pub hours: f64,
    /// Empty string when the source had no notes; never absent.
    #[serde(rename = "Notes")]
    pub notes: String,
}

impl CanonicalRow {
    /// Build a row from already-validated parts, deriving week and full name.
    pub fn new(
        date: NaiveDate,
        first_name: &str,
        last_name: &str,
        task: impl Into<String>,
        project: impl Into<String>,
        hours: f64,
        notes: Option<String>,
    ) -> Self {
        Self {
            date,
            week_start: crate::period::week_start(date),
            full_name: full_name(first_name, last_name),
            task: task.into(),
            project: project.into(),
            hours,
            notes: notes.unwrap_or_default(),
        }
    }
}

/// `first + " " + last`, the person identity used across all reports.
pub fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}")
}
