//! Dataset summary over emitted records
//!
//! Counts conductors, shows, decades, roles and run status, and finds the
//! earliest opening.

pub mod builder;

pub use builder::{summarize, DatasetSummary, FirstShow, StatusBreakdown, SummaryBuilder};
