//! Period assignment for aggregation keys.
//!
//! Weeks start on Monday (ISO numbering, Monday = 1 ... Sunday = 7). Months are
//! plain calendar months. Both are derived purely from a naive calendar date.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Returns the Monday that begins the ISO week containing `date`.
///
/// A Monday maps to itself; every other day maps back by `weekday - 1` days.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().number_from_monday() - 1);
    // Only fails within the first week of NaiveDate's range.
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A column key for a report matrix.
///
/// Implemented for week starts (rendered `YYYY-MM-DD`) and months (`YYYY-MM`).
pub trait Period: Copy + Ord + fmt::Debug {
    fn from_date(date: NaiveDate) -> Self;
    fn label(&self) -> String;
}

impl Period for NaiveDate {
    fn from_date(date: NaiveDate) -> Self {
        week_start(date)
    }

    fn label(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

impl Period for Month {
    fn from_date(date: NaiveDate) -> Self {
        Month::of(date)
    }

    fn label(&self) -> String {
        self.to_string()
    }
}
