//! Tabular input
//!
//! The transform only sees a [`RawTable`]; where it came from is decided here.

pub mod delimited;
pub mod workbook;

pub use delimited::CsvSource;
pub use workbook::XlsxSource;

use crate::error::TimelineError;
use crate::types::RawTable;
use anyhow::Result;
use std::path::Path;

/// Anything that can hand over a header row and its data rows
pub trait RowSource {
    fn read_table(&mut self) -> Result<RawTable>;
}

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Pick a reader by file extension
pub fn open_source(path: &Path, sheet: &str) -> Result<Box<dyn RowSource>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if extension == "csv" {
        return Ok(Box::new(CsvSource::from_path(path)?));
    }
    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(Box::new(XlsxSource::new(path, sheet)));
    }

    Err(TimelineError::UnsupportedSource(path.to_path_buf()).into())
}
