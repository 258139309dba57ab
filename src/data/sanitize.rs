use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{Dataset, Floor, RawRow, Record};

// ---------------------------------------------------------------------------
// Row sanitizer
// ---------------------------------------------------------------------------

/// Turn a floor's raw rows into valid records.
///
/// Rows with an empty tag, or an X, Y or Timestamp that does not parse,
/// are dropped. Survivors keep their input order and are stamped with
/// `floor`.
pub fn sanitize(rows: &[RawRow], floor: Floor) -> Dataset {
    let dataset: Dataset = rows
        .iter()
        .filter(|row| !row.timestamp.trim().is_empty())
        .filter_map(|row| sanitize_row(row, floor))
        .collect();

    let dropped = rows.len() - dataset.len();
    if dropped > 0 {
        log::debug!("Dropped {dropped} invalid rows from the {floor} floor feed");
    }
    dataset
}

fn sanitize_row(row: &RawRow, floor: Floor) -> Option<Record> {
    if row.tag.trim().is_empty() {
        return None;
    }
    Some(Record {
        tag: row.tag.clone(),
        x: parse_coordinate(&row.x)?,
        y: parse_coordinate(&row.y)?,
        timestamp: parse_timestamp(&row.timestamp)?,
        floor,
    })
}

/// A finite float, or nothing.
pub fn parse_coordinate(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Date-time layouts tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    // Spreadsheet exports in US locale.
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a feed timestamp. Offsets are folded into naive UTC.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
