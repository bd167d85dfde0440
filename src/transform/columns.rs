//! Column catalogue and header normalization

use crate::error::TimelineError;
use crate::types::{Cell, RawTable, SourceRow};
use std::collections::HashMap;

pub const ROW_ID: &str = "ROW ID";
pub const SHOW: &str = "SHOW";
pub const PRODUCTION_TYPE: &str = "PRODUCTION TYPE";
pub const OPENING_DATE: &str = "OPENING DATE";
pub const CLOSING_DATE: &str = "CLOSING DATE";
pub const PERFORMANCES: &str = "# of PERFORMANCES";
pub const FIRST_NAME: &str = "FIRST NAME";
pub const LAST_NAME: &str = "LAST NAME";
pub const LIFESPAN: &str = "Lifespan if deceased";
pub const ROLE: &str = "Role";
pub const PHOTO: &str = "LINK TO PHOTO";
pub const WEBSITE: &str = "WEBSITE";
pub const IBDB: &str = "INTERNET BROADWAY DATABASE";
pub const FUN_FACTS: &str = "PERSON FUN FACTS";
pub const PERSON_START_DATE: &str = "Person Start Date";
pub const PERSON_END_DATE: &str = "Person End Date";

/// Every column the source sheet must carry
pub const REQUIRED_COLUMNS: [&str; 16] = [
    ROW_ID,
    SHOW,
    PRODUCTION_TYPE,
    OPENING_DATE,
    CLOSING_DATE,
    PERFORMANCES,
    FIRST_NAME,
    LAST_NAME,
    LIFESPAN,
    ROLE,
    PHOTO,
    WEBSITE,
    IBDB,
    FUN_FACTS,
    PERSON_START_DATE,
    PERSON_END_DATE,
];

/// Columns coerced to dates
pub const DATE_COLUMNS: [&str; 4] = [OPENING_DATE, CLOSING_DATE, PERSON_START_DATE, PERSON_END_DATE];

/// Trim, then replace each pair of spaces with one space in a single
/// left-to-right pass. Three spaces become two.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().replace("  ", " ")
}

/// Normalize every header of a table
pub fn normalize_headers(headers: &[String]) -> Vec<String> {
    headers.iter().map(|h| normalize_header(h)).collect()
}

/// Fail on the first required column the normalized header set lacks
pub fn check_required(headers: &[String]) -> Result<(), TimelineError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(TimelineError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Turn a raw table into keyed rows. Headers are normalized and validated,
/// wholly blank rows are dropped.
pub fn to_source_rows(table: RawTable) -> Result<Vec<SourceRow>, TimelineError> {
    let headers = normalize_headers(&table.headers);
    check_required(&headers)?;

    // First occurrence of a duplicated header wins
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        if positions.contains_key(header.as_str()) {
            log::warn!("Duplicate column `{}` at position {}, keeping the first one", header, idx);
            continue;
        }
        positions.insert(header.as_str(), idx);
    }

    let mut rows = Vec::with_capacity(table.rows.len());
    let header_line = table.header_line;
    for (idx, raw) in table.rows.into_iter().enumerate() {
        let line = header_line + idx + 1;
        if raw.iter().all(Cell::is_empty) {
            log::debug!("Skipping blank line {}", line);
            continue;
        }

        let mut row = SourceRow::new(line);
        for (&name, &pos) in &positions {
            let cell = raw.get(pos).cloned().unwrap_or(Cell::Empty);
            row.insert(name, cell);
        }
        rows.push(row);
    }

    Ok(rows)
}
