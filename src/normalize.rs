//! Turns raw records into canonical rows.
//!
//! Absent notes become the empty string here and nowhere else; every later
//! stage may rely on `notes` being present.

use crate::config::{MalformedRowPolicy, RollupConfig};
use crate::error::{ErrorCode, Result, RollupError};
use crate::record::{CanonicalRow, RawRecord};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Output of [`normalize`]: the canonical rows and how many were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub rows: Vec<CanonicalRow>,
    pub skipped: usize,
}

/// Validate and canonicalize every record.
///
/// Under [`MalformedRowPolicy::Abort`] the first invalid record fails the
/// batch; under [`MalformedRowPolicy::Skip`] it is logged and dropped.
pub fn normalize(records: &[RawRecord], config: &RollupConfig) -> Result<Normalized> {
    let mut out = Normalized {
        rows: Vec::with_capacity(records.len()),
        skipped: 0,
    };

    for record in records {
        match normalize_record(record, &config.date_formats) {
            Ok(row) => out.rows.push(row),
            Err(e) => match config.on_malformed_row {
                MalformedRowPolicy::Abort => return Err(e),
                MalformedRowPolicy::Skip => {
                    warn!("Skipping row: {}", e);
                    out.skipped += 1;
                }
            },
        }
    }

    debug!(
        "Normalized {} rows ({} skipped)",
        out.rows.len(),
        out.skipped
    );
    Ok(out)
}

/// Canonicalize a single record.
pub fn normalize_record(record: &RawRecord, date_formats: &[String]) -> Result<CanonicalRow> {
    let date = parse_date(&record.date, date_formats).ok_or_else(|| {
        RollupError::malformed_row(
            ErrorCode::ROW_INVALID_DATE,
            record.line,
            "Date",
            record.date.as_str(),
            "is not a recognised date",
        )
    })?;
    let hours = parse_hours(record)?;

    let notes = record
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Ok(CanonicalRow::new(
        date,
        record.first_name.trim(),
        record.last_name.trim(),
        record.task.trim(),
        record.project.trim(),
        hours,
        notes,
    ))
}

/// Try each configured format in order. Time fields in a format are parsed
/// and then dropped, so timestamp formats yield their date.
pub fn parse_date(text: &str, formats: &[String]) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

fn parse_hours(record: &RawRecord) -> Result<f64> {
    let text = record.hours.trim();
    let hours = text
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite())
        .ok_or_else(|| {
            RollupError::malformed_row(
                ErrorCode::ROW_INVALID_HOURS,
                record.line,
                "Hours",
                text,
                "is not a number",
            )
        })?;

    if hours < 0.0 {
        return Err(RollupError::malformed_row(
            ErrorCode::ROW_NEGATIVE_HOURS,
            record.line,
            "Hours",
            text,
            "is negative",
        ));
    }
    // "-0" passes the sign check; store it as 0
    Ok(hours.abs())
}
