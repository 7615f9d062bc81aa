//! Report destinations.

use crate::error::{ErrorCode, Result, RollupError};
use crate::record::CanonicalRow;
use csv::Writer;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where rendered reports go.
pub trait TableSink {
    /// Write a table with a header row; returns the destination written.
    fn write_table(&self, name: &str, header: &[String], rows: &[Vec<String>]) -> Result<PathBuf>;

    /// Write the canonical row table.
    fn write_rows(&self, name: &str, rows: &[CanonicalRow]) -> Result<PathBuf>;
}

/// Writes each table as a CSV file inside a directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct CsvDirSink {
    dir: PathBuf,
}

impl CsvDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn open(&self, name: &str) -> Result<(PathBuf, Writer<std::fs::File>)> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            RollupError::sink_write(
                ErrorCode::SINK_CREATE_DIR,
                format!("cannot create directory {}", self.dir.display()),
                Some(self.dir.clone()),
            )
            .with_source(e)
        })?;

        let path = self.dir.join(name);
        let writer = Writer::from_path(&path).map_err(|e| write_error(&path, e))?;
        Ok((path, writer))
    }
}

fn write_error(path: &Path, err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> RollupError {
    RollupError::sink_write(
        ErrorCode::SINK_WRITE_FAILED,
        format!("cannot write {}", path.display()),
        Some(path.to_path_buf()),
    )
    .with_source(err)
}

impl TableSink for CsvDirSink {
    fn write_table(&self, name: &str, header: &[String], rows: &[Vec<String>]) -> Result<PathBuf> {
        let (path, mut writer) = self.open(name)?;

        writer
            .write_record(header)
            .map_err(|e| write_error(&path, e))?;
        for row in rows {
            writer.write_record(row).map_err(|e| write_error(&path, e))?;
        }
        writer.flush().map_err(|e| write_error(&path, e))?;

        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }

    fn write_rows(&self, name: &str, rows: &[CanonicalRow]) -> Result<PathBuf> {
        let (path, mut writer) = self.open(name)?;

        for row in rows {
            writer.serialize(row).map_err(|e| write_error(&path, e))?;
        }
        writer.flush().map_err(|e| write_error(&path, e))?;

        debug!("Wrote {} canonical rows to {}", rows.len(), path.display());
        Ok(path)
    }
}
