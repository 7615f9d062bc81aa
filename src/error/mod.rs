use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The error type for the whole roll-up pipeline
#[derive(Error, Debug)]
pub enum RollupError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Cannot read {}: {message}", .path.display())]
    SourceRead {
        code: u16,
        message: String,
        path: PathBuf,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Malformed row at line {line}: {field} {message} ({value:?})")]
    MalformedRow {
        code: u16,
        message: String,
        line: u64,
        field: String,
        value: String,
    },

    #[error("[E{code:04}] Cannot write report: {message}")]
    SinkWrite {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl RollupError {
    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a source error for the given input path
    pub fn source_read(code: u16, path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::SourceRead {
            code,
            message: message.into(),
            path: path.as_ref().to_path_buf(),
            source: None,
        }
    }

    /// Create a malformed row error; `line` is the 1-based line in the source file
    pub fn malformed_row(
        code: u16,
        line: u64,
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedRow {
            code,
            message: message.into(),
            line,
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a sink error, optionally tied to a destination path
    pub fn sink_write(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::SinkWrite {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::SourceRead { source: src, .. }
            | Self::SinkWrite { source: src, .. } => {
                *src = Some(source.into());
            }
            Self::MalformedRow { message, .. } => {
                *message = format!("{}: {}", message, source.into());
            }
        }
        self
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::SourceRead { .. } => 3,
            Self::MalformedRow { .. } => 4,
            Self::SinkWrite { .. } => 5,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::SourceRead { code, .. }
            | Self::MalformedRow { code, .. }
            | Self::SinkWrite { code, .. } => *code,
        }
    }

    /// Description of the error code, for `--verbose` diagnostics
    pub fn describe(&self) -> &'static str {
        describe_error_code(self.code())
    }
}

pub type Result<T> = std::result::Result<T, RollupError>;
