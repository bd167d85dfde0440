use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a run
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("required column `{column}` not found in source headers")]
    MissingColumn { column: String },

    #[error("line {line}: ROW ID `{value}` is not an integer")]
    InvalidRowId { line: usize, value: String },

    #[error("worksheet `{0}` not found in workbook")]
    SheetNotFound(String),

    #[error("unsupported source file type: {}", .0.display())]
    UnsupportedSource(PathBuf),

    #[error("source has no header row")]
    EmptySource,
}
