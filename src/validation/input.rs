//! Parsing and validation of raw caller input

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::types::{CalendarError, CalendarResult};
use crate::utils::time::wall_clock_to_utc;

/// Accepted layouts for timestamps that carry no offset
const WALL_CLOCK_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Upper bounds for the date-part filters
const DAY_MAX: u32 = 31;
const WEEK_MAX: u32 = 53;
const MONTH_MAX: u32 = 12;

/// Return the value if it is not blank, otherwise a `MissingField` error.
pub fn require_field<'a>(value: &'a str, field: &'static str) -> CalendarResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CalendarError::MissingField { field })
    } else {
        Ok(trimmed)
    }
}

/// Parse a timestamp and keep only its wall-clock fields.
///
/// An RFC 3339 offset, if present, is discarded: the caller's timezone decides
/// what the wall-clock value means.
pub fn parse_wall_clock(raw: &str, field: &str) -> CalendarResult<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_local());
    }

    WALL_CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| {
            CalendarError::InvalidParams(format!("{}: '{}' is not a valid timestamp", field, raw))
        })
}

/// Parse a filter instant.
///
/// RFC 3339 values are absolute. Values without an offset are wall-clock time
/// in `tz`.
pub fn parse_instant(raw: &str, field: &str, tz: &Tz) -> CalendarResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let wall_clock = parse_wall_clock(raw, field)?;
    Ok(wall_clock_to_utc(wall_clock, tz))
}

/// Parse a day/week/month/year filter value. Absent or empty means wildcard (0).
pub fn parse_date_part(raw: Option<&str>, field: &str) -> CalendarResult<u32> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(0),
        Some(raw) => raw,
    };

    let value: i64 = raw.parse().map_err(|_| {
        CalendarError::InvalidParams(format!(
            "error parsing date part value for {}: '{}'",
            field, raw
        ))
    })?;
    if value < 0 {
        return Err(CalendarError::InvalidParams(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }

    let max = match field {
        "day" => DAY_MAX,
        "week" => WEEK_MAX,
        "month" => MONTH_MAX,
        _ => u32::MAX,
    };
    u32::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| {
            CalendarError::InvalidParams(format!("{} is out of range: {}", field, value))
        })
}

/// Interpret a boolean query flag. Any non-empty value except an explicit negative turns it on.
pub fn parse_flag(raw: Option<&str>) -> bool {
    match raw.map(|s| s.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "false" | "0" | "no"),
    }
}
