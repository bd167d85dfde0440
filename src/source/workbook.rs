use crate::error::TimelineError;
use crate::source::RowSource;
use crate::types::{Cell, RawTable};
use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::{Path, PathBuf};

/// One worksheet of a spreadsheet file; its first row holds the headers
pub struct XlsxSource {
    path: PathBuf,
    sheet: String,
}

impl XlsxSource {
    pub fn new(path: impl AsRef<Path>, sheet: impl Into<String>) -> Self {
        XlsxSource {
            path: path.as_ref().to_path_buf(),
            sheet: sheet.into(),
        }
    }
}

impl RowSource for XlsxSource {
    fn read_table(&mut self) -> Result<RawTable> {
        let mut workbook = open_workbook_auto(&self.path)
            .with_context(|| format!("Failed to open workbook: {}", self.path.display()))?;

        if !workbook.sheet_names().iter().any(|name| name == &self.sheet) {
            return Err(TimelineError::SheetNotFound(self.sheet.clone()).into());
        }

        let range = workbook
            .worksheet_range(&self.sheet)
            .with_context(|| format!("Failed to read worksheet `{}`", self.sheet))?;

        // the range starts at the first used cell, not necessarily A1
        let header_line = range.start().map_or(1, |(row, _)| row as usize + 1);

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or(TimelineError::EmptySource)?
            .iter()
            .map(header_text)
            .collect();

        let rows: Vec<Vec<Cell>> = rows.map(|row| row.iter().map(convert_cell).collect()).collect();

        log::debug!(
            "Read {} rows from worksheet `{}` of {}",
            rows.len(),
            self.sheet,
            self.path.display()
        );
        Ok(RawTable::new(headers, rows).with_header_line(header_line))
    }
}

fn header_text(cell: &Data) -> String {
    convert_cell(cell).as_text().unwrap_or_default()
}

/// Map a spreadsheet cell onto the crate's cell model
pub(crate) fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        // as_datetime honours the workbook's 1904 flag; durations stay numeric
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => Cell::DateTime(value),
            None => Cell::Float(dt.as_f64()),
        },
    }
}
