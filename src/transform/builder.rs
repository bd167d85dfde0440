use crate::error::TimelineError;
use crate::transform::columns::*;
use crate::transform::dates::{coerce_date, decade_of};
use crate::types::{Cell, ConductorInfo, OutputRecord, Performances, ShowInfo, ShowStatus, SourceRow};

/// Builds one nested output record from one normalized source row
#[derive(Debug, Default)]
pub struct RecordBuilder;

impl RecordBuilder {
    pub fn new() -> Self {
        RecordBuilder
    }

    /// Build records for every row, preserving row order. The first schema
    /// error aborts the whole batch.
    pub fn build_all<'a, I>(&self, rows: I) -> Result<Vec<OutputRecord>, TimelineError>
    where
        I: IntoIterator<Item = &'a SourceRow>,
    {
        rows.into_iter().map(|row| self.build(row)).collect()
    }

    pub fn build(&self, row: &SourceRow) -> Result<OutputRecord, TimelineError> {
        let id = parse_row_id(row)?;

        // Person dates are coerced but never emitted
        let person_start = coerce_date(row.get(PERSON_START_DATE)?);
        let person_end = coerce_date(row.get(PERSON_END_DATE)?);

        let opening = coerce_date(row.get(OPENING_DATE)?);
        let status = match coerce_date(row.get(CLOSING_DATE)?) {
            Some(_) => ShowStatus::Closed,
            None => ShowStatus::Running,
        };

        let show_info = ShowInfo {
            title: text_or_default(row, SHOW)?,
            production_type: text_or_default(row, PRODUCTION_TYPE)?,
            status,
            opening,
            performances: parse_performances(row)?,
        };

        let conductor_info = ConductorInfo {
            name: full_name(row)?,
            lifespan: text_or_default(row, LIFESPAN)?,
            role: text_or_default(row, ROLE)?,
            photo: text_or_default(row, PHOTO)?,
            website: text_or_default(row, WEBSITE)?,
            ibdb: text_or_default(row, IBDB)?,
            fact: text_or_default(row, FUN_FACTS)?,
        };

        log::debug!(
            "line {}: built record {} ({}), person dates {:?} to {:?}",
            row.line,
            id,
            show_info.title,
            person_start,
            person_end
        );

        Ok(OutputRecord {
            id,
            show_info,
            conductor_info,
            decade: decade_of(opening),
        })
    }
}

fn text_or_default(row: &SourceRow, column: &str) -> Result<String, TimelineError> {
    Ok(row.get(column)?.as_text().unwrap_or_default())
}

/// Present name parts joined by one space; missing parts are left out
fn full_name(row: &SourceRow) -> Result<String, TimelineError> {
    let parts: Vec<String> = [FIRST_NAME, LAST_NAME]
        .iter()
        .map(|column| row.get(column).map(Cell::as_text))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect();
    Ok(parts.join(" "))
}

fn parse_row_id(row: &SourceRow) -> Result<i64, TimelineError> {
    let cell = row.get(ROW_ID)?;
    let id = match cell {
        Cell::Int(i) => Some(*i),
        Cell::Float(f) => float_to_id(*f),
        Cell::Text(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    id.ok_or_else(|| TimelineError::InvalidRowId {
        line: row.line,
        value: cell.as_text().unwrap_or_default(),
    })
}

/// Truncate toward zero; NaN, infinities and values outside `i64` are rejected
fn float_to_id(f: f64) -> Option<i64> {
    // 2^63, the first value past i64::MAX
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let truncated = f.trunc();
    if truncated.is_finite() && truncated >= -LIMIT && truncated < LIMIT {
        Some(truncated as i64)
    } else {
        None
    }
}

fn parse_performances(row: &SourceRow) -> Result<Performances, TimelineError> {
    let cell = row.get(PERFORMANCES)?;
    let value = match cell {
        _ if cell.is_empty() => 0.0,
        Cell::Int(i) => *i as f64,
        Cell::Float(f) => *f,
        Cell::Text(s) => match s.trim().replace(',', "").parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                log::warn!("line {}: performance count `{}` is not a number, using 0", row.line, s);
                0.0
            }
        },
        other => {
            log::warn!("line {}: performance count {:?} is not a number, using 0", row.line, other);
            0.0
        }
    };
    Ok(Performances(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    /// A row carrying every column, all empty
    fn blank_row(line: usize) -> SourceRow {
        REQUIRED_COLUMNS
            .iter()
            .fold(SourceRow::new(line), |row, column| row.with(*column, Cell::Empty))
    }

    fn hamilton() -> SourceRow {
        blank_row(2)
            .with(ROW_ID, Cell::Int(7))
            .with_text(SHOW, "Hamilton")
            .with_text(PRODUCTION_TYPE, "Original")
            .with_text(OPENING_DATE, "2015-08-06")
            .with_text(FIRST_NAME, "Alex")
            .with_text(LAST_NAME, "Lacamoire")
            .with_text(ROLE, "Conductor")
    }

    #[test]
    fn test_running_show_record() {
        let record = RecordBuilder::new().build(&hamilton()).unwrap();

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "id": 7,
                "show_info": {
                    "title": "Hamilton",
                    "type": "Original",
                    "status": "Running",
                    "opening": "2015-08-06",
                    "performances": 0
                },
                "conductor_info": {
                    "name": "Alex Lacamoire",
                    "lifespan": "",
                    "role": "Conductor",
                    "photo": "",
                    "website": "",
                    "ibdb": "",
                    "fact": ""
                },
                "decade": 2010
            })
        );
    }

    #[test]
    fn test_closing_date_marks_closed() {
        let row = hamilton()
            .with(CLOSING_DATE, Cell::Int(44000))
            .with(PERFORMANCES, Cell::Float(2642.0));
        let record = RecordBuilder::new().build(&row).unwrap();

        assert_eq!(record.show_info.status, ShowStatus::Closed);
        assert_eq!(record.show_info.performances, Performances(2642.0));
    }

    #[test]
    fn test_unparseable_closing_date_still_running() {
        let row = hamilton().with_text(CLOSING_DATE, "n/a");
        let record = RecordBuilder::new().build(&row).unwrap();
        assert_eq!(record.show_info.status, ShowStatus::Running);
    }

    #[test]
    fn test_missing_opening_gives_zero_decade() {
        let row = hamilton().with(OPENING_DATE, Cell::Empty);
        let record = RecordBuilder::new().build(&row).unwrap();

        assert_eq!(record.show_info.opening, None);
        assert_eq!(record.decade, 0);
        assert_eq!(serde_json::to_value(&record).unwrap()["show_info"]["opening"], json!(null));
    }

    #[test]
    fn test_datetime_opening() {
        let opened = NaiveDate::from_ymd_opt(1957, 9, 26).unwrap();
        let row = hamilton().with(OPENING_DATE, Cell::DateTime(opened.and_hms_opt(0, 0, 0).unwrap()));
        let record = RecordBuilder::new().build(&row).unwrap();

        assert_eq!(record.show_info.opening, Some(opened));
        assert_eq!(record.decade, 1950);
    }

    #[test]
    fn test_partial_names() {
        let row = hamilton().with(FIRST_NAME, Cell::Empty);
        assert_eq!(RecordBuilder::new().build(&row).unwrap().conductor_info.name, "Lacamoire");

        let row = hamilton().with(FIRST_NAME, Cell::Empty).with(LAST_NAME, Cell::Empty);
        assert_eq!(RecordBuilder::new().build(&row).unwrap().conductor_info.name, "");
    }

    #[test]
    fn test_optional_strings_are_cast() {
        let row = hamilton()
            .with(LIFESPAN, Cell::Text("1925-2004".into()))
            .with(FUN_FACTS, Cell::Int(3))
            .with(SHOW, Cell::Empty);
        let record = RecordBuilder::new().build(&row).unwrap();

        assert_eq!(record.conductor_info.lifespan, "1925-2004");
        assert_eq!(record.conductor_info.fact, "3");
        assert_eq!(record.show_info.title, "");
    }

    #[test]
    fn test_row_id_coercion() {
        let builder = RecordBuilder::new();
        assert_eq!(builder.build(&hamilton().with(ROW_ID, Cell::Float(12.0))).unwrap().id, 12);
        assert_eq!(builder.build(&hamilton().with_text(ROW_ID, " 13 ")).unwrap().id, 13);
        assert_eq!(builder.build(&hamilton().with(ROW_ID, Cell::Float(15.7))).unwrap().id, 15);
        assert_eq!(builder.build(&hamilton().with(ROW_ID, Cell::Float(-2.5))).unwrap().id, -2);
    }

    #[test]
    fn test_fractional_text_row_id_is_fatal() {
        let builder = RecordBuilder::new();
        for text in ["14.0", "7.9", "1e3"] {
            let err = builder.build(&hamilton().with_text(ROW_ID, text)).unwrap_err();
            assert!(matches!(err, TimelineError::InvalidRowId { ref value, .. } if value == text));
        }
    }

    #[test]
    fn test_out_of_range_float_row_id_is_fatal() {
        let builder = RecordBuilder::new();
        for value in [1e30, -1e30, 9_223_372_036_854_775_808.0, f64::INFINITY, f64::NAN] {
            let err = builder.build(&hamilton().with(ROW_ID, Cell::Float(value))).unwrap_err();
            assert!(matches!(err, TimelineError::InvalidRowId { line: 2, .. }));
        }
    }

    #[test]
    fn test_bad_row_id_is_fatal() {
        let builder = RecordBuilder::new();

        let err = builder.build(&hamilton().with(ROW_ID, Cell::Empty)).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidRowId { line: 2, .. }));

        let err = builder.build(&hamilton().with_text(ROW_ID, "seven")).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidRowId { ref value, .. } if value == "seven"));
    }

    #[test]
    fn test_text_performances() {
        let builder = RecordBuilder::new();
        let record = builder.build(&hamilton().with_text(PERFORMANCES, "1,234")).unwrap();
        assert_eq!(record.show_info.performances, Performances(1234.0));

        let record = builder.build(&hamilton().with_text(PERFORMANCES, "many")).unwrap();
        assert_eq!(record.show_info.performances, Performances(0.0));
    }

    #[test]
    fn test_build_all_keeps_order() {
        let rows: Vec<SourceRow> = (1..=5)
            .rev()
            .map(|id| hamilton().with(ROW_ID, Cell::Int(id)))
            .collect();
        let records = RecordBuilder::new().build_all(&rows).unwrap();

        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_missing_column_in_row() {
        let row = SourceRow::new(2).with(ROW_ID, Cell::Int(1));
        let err = RecordBuilder::new().build(&row).unwrap_err();
        assert!(matches!(err, TimelineError::MissingColumn { .. }));
    }
}
