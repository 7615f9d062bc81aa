//! Pure predicates partitioning canonical rows into report subsets

use crate::config::RollupConfig;
use crate::record::CanonicalRow;

/// Marker-based row classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    pub time_off_marker: String,
    pub qualifying_project_marker: String,
}

impl Classifier {
    pub fn new(time_off_marker: impl Into<String>, qualifying_project_marker: impl Into<String>) -> Self {
        Self {
            time_off_marker: time_off_marker.into(),
            qualifying_project_marker: qualifying_project_marker.into(),
        }
    }

    pub fn from_config(config: &RollupConfig) -> Self {
        Self::new(
            config.time_off_marker.as_str(),
            config.qualifying_project_marker.as_str(),
        )
    }

    /// Task starts with the time-off marker (pure predicate)
    pub fn is_time_off(&self, row: &CanonicalRow) -> bool {
        row.task.starts_with(&self.time_off_marker)
    }

    /// Project contains the qualifying marker (pure predicate)
    pub fn is_qualifying(&self, row: &CanonicalRow) -> bool {
        row.project.contains(&self.qualifying_project_marker)
    }

    /// Rows that are not time off.
    pub fn work_subset<'a>(&self, rows: &'a [CanonicalRow]) -> Vec<&'a CanonicalRow> {
        rows.iter().filter(|r| !self.is_time_off(r)).collect()
    }

    /// Rows in the qualifying category. Time off is not excluded here; callers
    /// intersect subsets themselves when they need to.
    pub fn qualifying_subset<'a>(&self, rows: &'a [CanonicalRow]) -> Vec<&'a CanonicalRow> {
        rows.iter().filter(|r| self.is_qualifying(r)).collect()
    }
}
