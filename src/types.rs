use crate::error::TimelineError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::path::PathBuf;

/// A raw cell value as delivered by a tabular source
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Blank cells and NaN floats both count as missing values
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// String cast of the cell, or `None` when the cell is missing
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let text = match self {
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => format_float(*f),
            Cell::Bool(true) => "True".to_string(),
            Cell::Bool(false) => "False".to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Empty => return None,
        };
        Some(text)
    }
}

/// Whole floats keep one fractional digit, so 1234 reads back as `1234.0`
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// A table as read from disk, before any header normalization
#[derive(Debug, Clone)]
pub struct RawTable {
    /// Header row, verbatim
    pub headers: Vec<String>,
    /// Data rows, one `Cell` per header
    pub rows: Vec<Vec<Cell>>,
    /// 1-based sheet line of the header row
    pub header_line: usize,
}

impl RawTable {
    /// Table whose header sits on line 1
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        RawTable {
            headers,
            rows,
            header_line: 1,
        }
    }

    pub fn with_header_line(mut self, line: usize) -> Self {
        self.header_line = line;
        self
    }
}

impl Default for RawTable {
    fn default() -> Self {
        RawTable::new(Vec::new(), Vec::new())
    }
}

/// One source row keyed by normalized column name
#[derive(Debug, Clone, Default)]
pub struct SourceRow {
    /// Line in the source sheet, header row being line 1
    pub line: usize,
    cells: HashMap<String, Cell>,
}

impl SourceRow {
    pub fn new(line: usize) -> Self {
        SourceRow {
            line,
            cells: HashMap::new(),
        }
    }

    pub fn with(mut self, column: impl Into<String>, cell: Cell) -> Self {
        self.insert(column, cell);
        self
    }

    pub fn with_text(self, column: impl Into<String>, text: impl Into<String>) -> Self {
        self.with(column, Cell::Text(text.into()))
    }

    pub fn insert(&mut self, column: impl Into<String>, cell: Cell) {
        self.cells.insert(column.into(), cell);
    }

    /// Look up a column; a column the row does not carry is a schema error
    pub fn get(&self, column: &str) -> Result<&Cell, TimelineError> {
        self.cells.get(column).ok_or_else(|| TimelineError::MissingColumn {
            column: column.to_string(),
        })
    }
}

/// Whether a show is still on stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShowStatus {
    Running,
    Closed,
}

/// Performance count; whole values serialize as JSON integers
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Performances(pub f64);

impl Serialize for Performances {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = self.0;
        if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            serializer.serialize_i64(value as i64)
        } else {
            serializer.serialize_f64(value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowInfo {
    pub title: String,
    #[serde(rename = "type")]
    pub production_type: String,
    pub status: ShowStatus,
    pub opening: Option<NaiveDate>,
    pub performances: Performances,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConductorInfo {
    pub name: String,
    pub lifespan: String,
    pub role: String,
    pub photo: String,
    pub website: String,
    pub ibdb: String,
    pub fact: String,
}

/// One emitted record per source row; field order is the document's field order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub id: i64,
    pub show_info: ShowInfo,
    pub conductor_info: ConductorInfo,
    pub decade: i32,
}

/// Configuration for one transform run
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Spreadsheet or CSV to read
    pub source: PathBuf,

    /// JSON document to (over)write
    pub destination: PathBuf,

    /// Worksheet name, ignored for CSV sources
    pub sheet: String,

    /// Emit compact JSON instead of 4-space indented JSON
    pub compact: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            source: PathBuf::from("Conductor Timeline Data_Contest.xlsx"),
            destination: PathBuf::from("cleaned_data.json"),
            sheet: String::from("Conductor Timeline"),
            compact: false,
        }
    }
}
