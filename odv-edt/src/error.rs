use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// File level failures. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum Error {
  #[error("unable to detect encoding for '{}'", path.display())]
  Encoding { path: PathBuf },
  #[error("unable to read '{}': {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("{}:{line}: invalid lookup entry '{entry}'", path.display())]
  Lookup {
    path: PathBuf,
    line: usize,
    entry: String,
  },
  #[error("invalid start time list: {0}")]
  Schedule(String),
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}

/// Problems local to one export row. They are logged and never abort the run.
///
/// `line` is the line of the row in the source file (the header is line 1).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RowError {
  #[error("row {line}: expected at least {expected} fields, found {found}")]
  Malformed {
    line: u64,
    expected: usize,
    found: usize,
  },
  #[error("row {line}: unreadable record: {reason}")]
  Unreadable { line: u64, reason: String },
  #[error("row {line}: invalid duration '{value}'")]
  Duration { line: u64, value: String },
  #[error("row {line}: unknown start time '{value}'")]
  UnknownStartTime { line: u64, value: String },
  #[error("row {line}: unknown weekday '{value}'")]
  UnknownDay { line: u64, value: String },
  #[error("row {line}: unknown subject code '{code}'")]
  UnknownSubject { line: u64, code: String },
  #[error("row {line}: unknown class format '{value}'")]
  UnknownClassFormat { line: u64, value: String },
  #[error("row {line}: {hours}h lesson starting at '{start}' runs past the last slot")]
  SlotOverflow { line: u64, start: String, hours: u8 },
}

impl RowError {
  pub fn line(&self) -> u64 {
    match self {
      RowError::Malformed { line, .. }
      | RowError::Unreadable { line, .. }
      | RowError::Duration { line, .. }
      | RowError::UnknownStartTime { line, .. }
      | RowError::UnknownDay { line, .. }
      | RowError::UnknownSubject { line, .. }
      | RowError::UnknownClassFormat { line, .. }
      | RowError::SlotOverflow { line, .. } => *line,
    }
  }
}
