//! Row-to-record transformation
//!
//! Headers are normalized, date columns coerced, and each source row is
//! reshaped into one nested record. The record array is then written as a
//! single JSON document.

pub mod builder;
pub mod columns;
pub mod dates;
pub mod writer;

pub use builder::RecordBuilder;
pub use columns::{normalize_header, to_source_rows, REQUIRED_COLUMNS};
pub use dates::{coerce_date, decade_of};
pub use writer::{write_document, RecordWriter};
