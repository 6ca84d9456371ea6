use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::catalog::errors::{Error, Result};

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses a release date as found in `data.json` keys and `published_at` fields.
///
/// Accepts a plain `YYYY-MM-DD` date, an RFC 3339 timestamp, or a timestamp
/// without offset. Only the calendar date is kept. `context` names where the
/// value came from and ends up in the error message.
pub fn parse_release_date(value: &str, context: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date_time.date_naive());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(date_time.date());
        }
    }

    Err(Error::InvalidDate {
        value: value.to_string(),
        context: context.to_string(),
    })
}

/// Long en-US form used for section headings, e.g. "Sunday, January 14, 2024".
pub fn format_long(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
