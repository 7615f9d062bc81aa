//! Conditional per-bucket sums, used by the monthly summary.

use super::{sum_hours, AggregationKey, Reducer};
use crate::classify::Classifier;
use crate::config::{BucketConfig, BucketTerm, RollupConfig};
use crate::matrix::ColumnKey;
use crate::period::Period;
use crate::record::CanonicalRow;
use std::collections::BTreeMap;

/// Sums hours into each configured bucket, rounding to whole hours.
///
/// A row counts toward a bucket when it matches any of the bucket's terms;
/// it is never counted twice within the same bucket. Time-off exclusion uses
/// the same [`Classifier`] as the weekly reports.
#[derive(Debug, Clone)]
pub struct BucketReducer {
    buckets: Vec<BucketConfig>,
    classifier: Classifier,
}

impl BucketReducer {
    pub fn new(buckets: Vec<BucketConfig>, classifier: Classifier) -> Self {
        Self {
            buckets,
            classifier,
        }
    }

    pub fn from_config(config: &RollupConfig) -> Self {
        Self::new(config.monthly_buckets(), Classifier::from_config(config))
    }

    /// Spread each group's bucket sums into one cell per `(bucket, period)`.
    pub fn flatten<P: Period>(
        &self,
        sums: BTreeMap<AggregationKey<P>, Vec<f64>>,
    ) -> BTreeMap<(String, BucketColumn<P>), f64> {
        let mut cells = BTreeMap::new();
        for ((person, period), values) in sums {
            for (index, (bucket, value)) in self.buckets.iter().zip(values).enumerate() {
                let column = BucketColumn {
                    index,
                    period,
                    label: bucket.label.clone(),
                };
                cells.insert((person.clone(), column), value);
            }
        }
        cells
    }

    fn term_matches(&self, term: &BucketTerm, row: &CanonicalRow) -> bool {
        row.project.contains(&term.project_contains)
            && term
                .exclude_task_contains
                .as_deref()
                .map_or(true, |excluded| !row.task.contains(excluded))
            && !(term.exclude_time_off && self.classifier.is_time_off(row))
    }
}

impl Reducer for BucketReducer {
    type Output = Vec<f64>;

    fn reduce(&self, rows: &[&CanonicalRow]) -> Vec<f64> {
        self.buckets
            .iter()
            .map(|bucket| {
                let matching = rows
                    .iter()
                    .copied()
                    .filter(|row| bucket.terms.iter().any(|t| self.term_matches(t, row)));
                sum_hours(matching).round()
            })
            .collect()
    }
}

/// A `(bucket, period)` column. Orders bucket-major, then by period.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct BucketColumn<P> {
    pub index: usize,
    pub period: P,
    pub label: String,
}

impl<P: Period> ColumnKey for BucketColumn<P> {
    fn label(&self) -> String {
        format!("{} {}", self.label, self.period.label())
    }
}
