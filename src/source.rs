//! Reads raw timesheet records from a delimited file.

use crate::config::RollupConfig;
use crate::error::{ErrorCode, Result, RollupError};
use crate::record::{RawRecord, REQUIRED_COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Read every record from the CSV file at `path`.
///
/// Fails with `SourceRead` if the file is missing or unreadable, if any
/// required column is absent, or if a record cannot be decoded.
pub fn read_records(path: &Path, config: &RollupConfig) -> Result<Vec<RawRecord>> {
    if !path.is_file() {
        return Err(RollupError::source_read(
            ErrorCode::SOURCE_NOT_FOUND,
            path,
            "file does not exist",
        ));
    }

    let file = std::fs::File::open(path).map_err(|e| {
        RollupError::source_read(ErrorCode::SOURCE_GENERIC, path, "cannot open file").with_source(e)
    })?;

    let records = read_from(file, path, config)?;
    info!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Read records from any reader; `path` is only used in error messages.
pub fn read_from<R: Read>(input: R, path: &Path, config: &RollupConfig) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| {
            RollupError::source_read(ErrorCode::SOURCE_GENERIC, path, "cannot read header row")
                .with_source(e)
        })?
        .clone();
    check_columns(&headers, path, config)?;

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    loop {
        let more = reader.read_record(&mut row).map_err(|e| {
            RollupError::source_read(
                ErrorCode::SOURCE_UNREADABLE_RECORD,
                path,
                "cannot read record",
            )
            .with_source(e)
        })?;
        if !more {
            break;
        }

        let line = row.position().map_or(0, |p| p.line());
        let mut record: RawRecord = row.deserialize(Some(&headers)).map_err(|e| {
            RollupError::source_read(
                ErrorCode::SOURCE_UNREADABLE_RECORD,
                path,
                format!("cannot decode record at line {line}"),
            )
            .with_source(e)
        })?;
        record.line = line;
        records.push(record);
    }

    Ok(records)
}

fn check_columns(headers: &StringRecord, path: &Path, config: &RollupConfig) -> Result<()> {
    let present: Vec<&str> = headers.iter().collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();
    if !missing.is_empty() {
        return Err(RollupError::source_read(
            ErrorCode::SOURCE_MISSING_COLUMNS,
            path,
            format!("missing required columns: {}", missing.join(", ")),
        ));
    }

    for column in present {
        if REQUIRED_COLUMNS.contains(&column) {
            continue;
        }
        if config.discarded_columns.iter().any(|d| d == column) {
            debug!("Discarding column '{}'", column);
        } else {
            debug!("Ignoring unexpected column '{}'", column);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Client,First Name,Last Name,Task,Project,Hours,Notes,Billable?";

    fn read(data: &str) -> Result<Vec<RawRecord>> {
        read_from(data.as_bytes(), Path::new("test.csv"), &RollupConfig::default())
    }

    #[test]
    fn test_reads_canonical_columns_and_ignores_others() {
        let data = format!(
            "{HEADER}\n2024-01-03,Acme,Alice,Smith,Dev,Engineering R&D - X,5,EPIC-1,Yes\n\
             2024-01-10, Acme ,Alice,Smith,Dev,Engineering R&D - X,3,,No\n"
        );
        let records = read(&data).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].first_name, "Alice");
        assert_eq!(records[0].notes.as_deref(), Some("EPIC-1"));
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].notes, None);
        assert_eq!(records[1].hours, "3");
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_missing_columns_are_listed() {
        let err = read("Date,First Name,Task,Hours\n2024-01-03,Alice,Dev,5\n").unwrap_err();

        assert_eq!(err.code(), ErrorCode::SOURCE_MISSING_COLUMNS);
        let text = err.to_string();
        assert!(text.contains("Last Name"));
        assert!(text.contains("Project"));
        assert!(text.contains("Notes"));
    }

    #[test]
    fn test_ragged_record_is_source_error() {
        let data = format!("{HEADER}\n2024-01-03,Acme,Alice\n");
        let err = read(&data).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SOURCE_UNREADABLE_RECORD);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = read_records(Path::new("/nonexistent/data.csv"), &RollupConfig::default())
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::SOURCE_NOT_FOUND);
    }

    #[test]
    fn test_header_only_file_yields_no_records() {
        assert!(read(&format!("{HEADER}\n")).unwrap().is_empty());
    }
}
