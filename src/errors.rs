use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors that abort a run. None of these are recovered internally: the
/// caller logs the error and the process exits without a complete report.
#[derive(Debug, Error)]
pub enum TagError {
    /// An input file path does not exist.
    #[error("input file not found: {path}")]
    NotFound { path: String },

    /// A malformed lookup-table row or flow-log line.
    #[error("malformed input at line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// The output destination could not be opened or written.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl TagError {
    pub fn format(line: usize, reason: impl Into<String>) -> Self {
        TagError::Format {
            line,
            reason: reason.into(),
        }
    }

    /// Maps an open error on `path` to `NotFound` when the file is missing,
    /// keeping other I/O failures as-is.
    pub fn from_open(err: io::Error, path: &Path) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            TagError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            TagError::Io(err)
        }
    }
}
