//! Group-by and reduction over canonical rows.
//!
//! Rows are grouped into an ordered map keyed by `(person, period)`, then each
//! group is folded by a [`Reducer`]. Reshaping the result into a matrix is a
//! separate step (see [`crate::matrix::ReportMatrix::pivot`]).

pub mod buckets;

pub use buckets::{BucketColumn, BucketReducer};

use crate::period::Period;
use crate::record::CanonicalRow;
use std::collections::{BTreeMap, BTreeSet};

/// Sentinel emitted by [`NotesReducer`] for a group without any notes.
pub const MISSING: &str = "missing";

/// `(person, period)`: identifies one cell's worth of input rows.
pub type AggregationKey<P> = (String, P);

/// Folds the rows of one group into a single value.
pub trait Reducer {
    type Output;

    fn reduce(&self, rows: &[&CanonicalRow]) -> Self::Output;
}

/// Total hours over `rows`. An empty input sums to `+0.0`.
pub fn sum_hours<'a, I>(rows: I) -> f64
where
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    rows.into_iter().fold(0.0, |total, row| total + row.hours)
}

/// Sum of hours.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoursReducer;

impl Reducer for HoursReducer {
    type Output = f64;

    fn reduce(&self, rows: &[&CanonicalRow]) -> f64 {
        sum_hours(rows.iter().copied())
    }
}

fn distinct_notes<'a>(rows: &[&'a CanonicalRow]) -> BTreeSet<&'a str> {
    rows.iter()
        .map(|r| r.notes.as_str())
        .filter(|n| !n.is_empty())
        .collect()
}

/// Distinct non-empty notes joined with a comma, or [`MISSING`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NotesReducer;

impl Reducer for NotesReducer {
    type Output = String;

    fn reduce(&self, rows: &[&CanonicalRow]) -> String {
        let distinct = distinct_notes(rows);
        if distinct.is_empty() {
            MISSING.to_string()
        } else {
            distinct.into_iter().collect::<Vec<_>>().join(",")
        }
    }
}

/// Number of distinct non-empty notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteCountReducer;

impl Reducer for NoteCountReducer {
    type Output = usize;

    fn reduce(&self, rows: &[&CanonicalRow]) -> usize {
        distinct_notes(rows).len()
    }
}

/// Group rows by person and period, preserving input order within a group.
pub fn group_by<'a, P, I>(rows: I) -> BTreeMap<AggregationKey<P>, Vec<&'a CanonicalRow>>
where
    P: Period,
    I: IntoIterator<Item = &'a CanonicalRow>,
{
    let mut groups: BTreeMap<AggregationKey<P>, Vec<&'a CanonicalRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.full_name.clone(), P::from_date(row.date)))
            .or_default()
            .push(row);
    }
    groups
}

/// Group rows and reduce every group with `reducer`.
pub fn aggregate<'a, P, I, R>(rows: I, reducer: &R) -> BTreeMap<AggregationKey<P>, R::Output>
where
    P: Period,
    I: IntoIterator<Item = &'a CanonicalRow>,
    R: Reducer,
{
    group_by::<P, I>(rows)
        .into_iter()
        .map(|(key, group)| {
            let value = reducer.reduce(&group);
            (key, value)
        })
        .collect()
}
