//! Lenient date coercion
//!
//! Any cell that cannot be read as a calendar date coerces to `None`. Nothing
//! here returns an error.

use crate::types::Cell;
use calamine::{ExcelDateTime, ExcelDateTimeType};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:[ T](\d{1,2}):(\d{2})(?::(\d{2})(?:\.\d+)?)?)?$").unwrap()
});

static US_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})$").unwrap()
});

static MONTH_FIRST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2}),?\s+(\d{4})$").unwrap()
});

static DAY_FIRST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\s+([A-Za-z]+)\.?,?\s+(\d{4})$").unwrap()
});

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Largest serial Excel can represent (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Coerce a cell to a date, or `None` when it is empty or unreadable
pub fn coerce_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Int(i) => excel_serial_to_datetime(*i as f64).map(|dt| dt.date()),
        Cell::Float(f) => excel_serial_to_datetime(*f).map(|dt| dt.date()),
        Cell::Text(s) => parse_date_text(s),
        Cell::Bool(_) | Cell::Empty => None,
    }
}

/// Convert a bare Excel serial number (1900 date system) to a timestamp.
/// Only plain numbers in date columns come through here; spreadsheet date
/// cells carry their own date system and are decoded when read.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL + 1.0).contains(&serial) {
        return None;
    }
    ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, false).as_datetime()
}

/// Parse the textual date shapes found in hand-maintained sheets
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE_REGEX.captures(text) {
        if let Some(hour) = caps.get(4) {
            let hour = hour.as_str().parse().ok()?;
            let minute = caps[5].parse().ok()?;
            let second = caps.get(6).map_or(Some(0), |s| s.as_str().parse().ok())?;
            NaiveTime::from_hms_opt(hour, minute, second)?;
        }
        return ymd(&caps[1], &caps[2], &caps[3]);
    }

    if let Some(caps) = US_DATE_REGEX.captures(text) {
        let year = expand_year(&caps[3])?;
        return NaiveDate::from_ymd_opt(year, caps[1].parse().ok()?, caps[2].parse().ok()?);
    }

    if let Some(caps) = MONTH_FIRST_REGEX.captures(text) {
        let month = month_from_name(&caps[1])?;
        return NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[2].parse().ok()?);
    }

    if let Some(caps) = DAY_FIRST_REGEX.captures(text) {
        let month = month_from_name(&caps[2])?;
        return NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[1].parse().ok()?);
    }

    None
}

/// Decade bucket of an optional opening date; 0 when absent
pub fn decade_of(date: Option<NaiveDate>) -> i32 {
    match date {
        Some(d) => (d.year().div_euclid(10) * 10).max(0),
        None => 0,
    }
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Two-digit years pivot at 69: 69-99 are 19xx, 00-68 are 20xx
fn expand_year(year: &str) -> Option<i32> {
    let value: i32 = year.parse().ok()?;
    if year.len() == 4 {
        return Some(value);
    }
    Some(if value >= 69 { 1900 + value } else { 2000 + value })
}

/// Full month names or any prefix of at least three letters ("Sep", "Sept")
fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_ascii_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| m.starts_with(&name))
        .map(|idx| idx as u32 + 1)
}
