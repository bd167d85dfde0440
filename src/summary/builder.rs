//! Streaming summary accumulator
//!
//! Records are folded in one at a time; the summary is only assembled when
//! `build` is called.

use crate::types::{OutputRecord, ShowStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Headline numbers for a produced document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub unique_conductors: usize,
    pub unique_shows: usize,
    /// Distinct non-zero decades
    pub decades: usize,
    pub by_decade: BTreeMap<i32, usize>,
    pub role_breakdown: BTreeMap<String, usize>,
    pub status_breakdown: StatusBreakdown,
    pub first_show: Option<FirstShow>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub running: usize,
    pub closed: usize,
}

/// The record with the earliest opening date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstShow {
    pub id: i64,
    pub title: String,
    pub opening: NaiveDate,
}

#[derive(Debug, Default)]
pub struct SummaryBuilder {
    total: usize,
    conductors: HashSet<String>,
    shows: HashSet<String>,
    by_decade: BTreeMap<i32, usize>,
    roles: BTreeMap<String, usize>,
    status: StatusBreakdown,
    first_show: Option<FirstShow>,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: &OutputRecord) {
        self.total += 1;

        let name = &record.conductor_info.name;
        if !name.is_empty() {
            self.conductors.insert(name.clone());
        }
        let title = &record.show_info.title;
        if !title.is_empty() {
            self.shows.insert(title.clone());
        }
        let role = &record.conductor_info.role;
        if !role.is_empty() {
            *self.roles.entry(role.clone()).or_insert(0) += 1;
        }

        *self.by_decade.entry(record.decade).or_insert(0) += 1;

        match record.show_info.status {
            ShowStatus::Running => self.status.running += 1,
            ShowStatus::Closed => self.status.closed += 1,
        }

        if let Some(opening) = record.show_info.opening {
            // strictly earlier, so ties keep the first row
            let earlier = self
                .first_show
                .as_ref()
                .map_or(true, |current| opening < current.opening);
            if earlier {
                self.first_show = Some(FirstShow {
                    id: record.id,
                    title: title.clone(),
                    opening,
                });
            }
        }
    }

    pub fn add_records<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a OutputRecord>,
    {
        for record in records {
            self.add_record(record);
        }
    }

    pub fn build(self) -> DatasetSummary {
        let decades = self.by_decade.keys().filter(|d| **d != 0).count();
        DatasetSummary {
            total_records: self.total,
            unique_conductors: self.conductors.len(),
            unique_shows: self.shows.len(),
            decades,
            by_decade: self.by_decade,
            role_breakdown: self.roles,
            status_breakdown: self.status,
            first_show: self.first_show,
        }
    }
}

/// Summarize a full record slice in one call
pub fn summarize(records: &[OutputRecord]) -> DatasetSummary {
    let mut builder = SummaryBuilder::new();
    builder.add_records(records);
    builder.build()
}
