//! Run configuration.
//!
//! Marker strings, column lists, default paths and the malformed-row policy
//! all live in [`RollupConfig`] and are passed explicitly into the normalizer,
//! the classifier and the report driver. Values are layered:
//!
//! 1. Hardcoded defaults (lowest priority)
//! 2. Optional TOML file (`--config <path>`)
//! 3. Environment variables (`TIMESHEET_*` prefix)
//! 4. CLI flags (highest priority, applied by the binary)

pub mod loader;

pub use loader::{load_config, ENV_MALFORMED_POLICY, ENV_QUALIFYING_MARKER, ENV_TIME_OFF_MARKER};

use crate::error::{ErrorCode, Result, RollupError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// What to do with a row whose date or hours cannot be validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Fail the whole run on the first malformed row (default).
    #[default]
    Abort,
    /// Log a warning, drop the row and keep going.
    Skip,
}

impl FromStr for MalformedRowPolicy {
    type Err = RollupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(RollupError::config_with_code(
                ErrorCode::CONFIG_PARSE_ERROR,
                format!("on_malformed_row must be 'abort' or 'skip', got '{other}'"),
            )),
        }
    }
}

/// Configuration for a whole roll-up run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollupConfig {
    /// Task prefix identifying time-off entries.
    pub time_off_marker: String,

    /// Project substring identifying SR&ED-qualifying entries.
    pub qualifying_project_marker: String,

    /// Known extraneous columns of the timesheet export. They are dropped
    /// silently; any other unexpected column is logged.
    pub discarded_columns: Vec<String>,

    /// Input file used when none is given on the command line.
    pub default_input: PathBuf,

    /// Output directory used when none is given on the command line.
    pub default_output_dir: PathBuf,

    pub on_malformed_row: MalformedRowPolicy,

    /// `chrono` format strings tried, in order, when parsing the Date column.
    /// Formats with time fields accept timestamps and keep only the date.
    pub date_formats: Vec<String>,

    pub monthly: MonthlyConfig,
}

/// Buckets for the monthly summary report.
///
/// Without a `buckets` list the defaults are derived from the effective
/// markers; see [`RollupConfig::monthly_buckets`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonthlyConfig {
    pub buckets: Option<Vec<BucketConfig>>,
}

/// One output bucket: the sum of hours over rows matching any of its terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub label: String,
    pub terms: Vec<BucketTerm>,
}

/// A predicate-and-sum term. A row matches when its project contains
/// `project_contains`, its task does not contain `exclude_task_contains`
/// (if set), and, with `exclude_time_off`, the row is not time off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketTerm {
    pub project_contains: String,
    #[serde(default)]
    pub exclude_task_contains: Option<String>,
    #[serde(default)]
    pub exclude_time_off: bool,
}

impl BucketTerm {
    pub fn project(project_contains: impl Into<String>) -> Self {
        Self {
            project_contains: project_contains.into(),
            exclude_task_contains: None,
            exclude_time_off: false,
        }
    }
}

pub const DEFAULT_TIME_OFF_MARKER: &str = "Time off:";
pub const DEFAULT_QUALIFYING_MARKER: &str = "Engineering R&D";
const SUPPORT_PROJECT: &str = "Engineering Support";
const GENERAL_PROJECT: &str = "General";

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            time_off_marker: DEFAULT_TIME_OFF_MARKER.to_string(),
            qualifying_project_marker: DEFAULT_QUALIFYING_MARKER.to_string(),
            discarded_columns: default_discarded_columns(),
            default_input: PathBuf::from("data.csv"),
            default_output_dir: PathBuf::from("reports"),
            on_malformed_row: MalformedRowPolicy::default(),
            date_formats: default_date_formats(),
            monthly: MonthlyConfig::default(),
        }
    }
}

fn default_discarded_columns() -> Vec<String> {
    [
        "Employee?",
        "Billable?",
        "Invoiced?",
        "Approved?",
        "Roles",
        "External Reference URL",
        "Client",
        "Project Code",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%d",
        "%m/%d/%Y",
        "%Y/%m/%d",
        "%d-%b-%Y",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl RollupConfig {
    /// Configured monthly buckets, or the `R&D` / `Non-R&D` pair built from
    /// the effective qualifying marker and time-off rule.
    pub fn monthly_buckets(&self) -> Vec<BucketConfig> {
        if let Some(buckets) = &self.monthly.buckets {
            return buckets.clone();
        }

        vec![
            BucketConfig {
                label: "R&D".to_string(),
                terms: vec![BucketTerm::project(self.qualifying_project_marker.as_str())],
            },
            BucketConfig {
                label: "Non-R&D".to_string(),
                terms: vec![
                    BucketTerm::project(SUPPORT_PROJECT),
                    BucketTerm {
                        exclude_time_off: true,
                        ..BucketTerm::project(GENERAL_PROJECT)
                    },
                ],
            },
        ]
    }

    /// Check every field and report all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.time_off_marker.trim().is_empty() {
            problems.push("time_off_marker cannot be empty".to_string());
        }
        if self.qualifying_project_marker.trim().is_empty() {
            problems.push("qualifying_project_marker cannot be empty".to_string());
        }
        if self.date_formats.is_empty() {
            problems.push("date_formats must list at least one format".to_string());
        }
        if self.default_output_dir.as_os_str().is_empty() {
            problems.push("default_output_dir cannot be empty".to_string());
        }

        if self.monthly.buckets.as_ref().is_some_and(Vec::is_empty) {
            problems.push("monthly.buckets must list at least one bucket".to_string());
        }
        for (i, bucket) in self.monthly.buckets.iter().flatten().enumerate() {
            if bucket.label.trim().is_empty() {
                problems.push(format!("monthly.buckets[{i}].label cannot be empty"));
            }
            if bucket.terms.is_empty() {
                problems.push(format!("monthly.buckets[{i}] must have at least one term"));
            }
            if bucket.terms.iter().any(|t| t.project_contains.is_empty()) {
                problems.push(format!(
                    "monthly.buckets[{i}] has a term with an empty project_contains"
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(RollupError::config_with_code(
                ErrorCode::CONFIG_VALIDATION_FAILED,
                problems.join("; "),
            ))
        }
    }
}
