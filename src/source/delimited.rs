use crate::error::TimelineError;
use crate::source::RowSource;
use crate::types::{Cell, RawTable};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Comma-separated source; every non-empty field arrives as text
pub struct CsvSource<R: Read> {
    reader: csv::Reader<R>,
}

impl CsvSource<File> {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open source: {}", path.display()))?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        CsvSource { reader }
    }
}

impl<R: Read> RowSource for CsvSource<R> {
    fn read_table(&mut self) -> Result<RawTable> {
        let headers: Vec<String> = self
            .reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.is_empty() {
            return Err(TimelineError::EmptySource.into());
        }

        let mut rows = Vec::new();
        for record in self.reader.records() {
            let record = record.context("Failed to read CSV record")?;
            let mut row: Vec<Cell> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect();
            row.resize(headers.len(), Cell::Empty);
            rows.push(row);
        }

        log::debug!("Read {} CSV rows with {} columns", rows.len(), headers.len());
        Ok(RawTable::new(headers, rows))
    }
}
