//! # Baton - Broadway conductor timeline preparation
//!
//! Turns the conductor timeline spreadsheet into the JSON document the
//! visualization front end loads.
//!
//! ## Modules
//!
//! - **source**: read a spreadsheet or CSV into a raw table
//! - **transform**: normalize headers, coerce values, build nested records, write JSON
//! - **summary**: headline statistics over the emitted records
//!
//! ## Quick Start
//!
//! ```rust
//! use baton::transform::columns::*;
//! use baton::{transform_rows, Cell, SourceRow};
//!
//! # fn main() -> anyhow::Result<()> {
//! let row = REQUIRED_COLUMNS
//!     .iter()
//!     .fold(SourceRow::new(2), |row, column| row.with(*column, Cell::Empty))
//!     .with(ROW_ID, Cell::Int(7))
//!     .with_text(SHOW, "Hamilton")
//!     .with_text(OPENING_DATE, "2015-08-06");
//!
//! let records = transform_rows(&[row])?;
//! assert_eq!(records[0].decade, 2010);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};

pub mod error;
pub mod source;
pub mod summary;
pub mod transform;
pub mod types;

// Re-export commonly used types for convenience
pub use error::TimelineError;
pub use source::{open_source, CsvSource, RowSource, XlsxSource};
pub use summary::{summarize, DatasetSummary, SummaryBuilder};
pub use transform::{write_document, RecordBuilder, RecordWriter};
pub use types::{
    Cell, ConductorInfo, OutputRecord, Performances, RawTable, ShowInfo, ShowStatus, SourceRow,
    TransformConfig,
};

/// Build one record per row, in row order
pub fn transform_rows(rows: &[SourceRow]) -> Result<Vec<OutputRecord>> {
    let records = RecordBuilder::new().build_all(rows)?;
    Ok(records)
}

/// Normalize and validate a raw table, then build its records
pub fn transform_table(table: RawTable) -> Result<Vec<OutputRecord>> {
    let rows = transform::to_source_rows(table)?;
    transform_rows(&rows)
}

/// Read everything a source offers and build its records
pub fn transform_source(source: &mut dyn RowSource) -> Result<Vec<OutputRecord>> {
    let table = source.read_table()?;
    transform_table(table)
}

/// Main entry point: read the configured source, write the configured
/// destination, and hand back the records that were written
pub fn run(config: &TransformConfig) -> Result<Vec<OutputRecord>> {
    log::info!("Reading {}", config.source.display());
    let mut source = open_source(&config.source, &config.sheet)?;
    let records = transform_source(source.as_mut())
        .with_context(|| format!("Failed to transform {}", config.source.display()))?;

    log::info!("Writing {} records to {}", records.len(), config.destination.display());
    write_document(&config.destination, &records, config.compact)?;

    Ok(records)
}
