//! Timezone conversion utilities
//!
//! Events are stored as UTC instants. Callers read and write wall-clock time
//! in their own IANA timezone; these functions translate between the two.

use std::collections::HashMap;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::types::{CalendarError, CalendarResult};

/// Resolved timezones keyed by the name they were requested with
static TIMEZONES: Lazy<RwLock<HashMap<String, Tz>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Resolve an IANA timezone name, caching the result.
pub fn resolve_timezone(name: &str) -> CalendarResult<Tz> {
    if let Some(tz) = TIMEZONES.read().get(name) {
        return Ok(*tz);
    }

    let tz: Tz = name
        .parse()
        .map_err(|_| CalendarError::UnknownTimezone(name.to_string()))?;
    TIMEZONES.write().insert(name.to_string(), tz);
    Ok(tz)
}

/// Interpret `wall_clock` as local time in the named timezone and return the UTC instant.
pub fn to_utc(wall_clock: NaiveDateTime, timezone: &str) -> CalendarResult<DateTime<Utc>> {
    let tz = resolve_timezone(timezone)?;
    Ok(wall_clock_to_utc(wall_clock, &tz))
}

/// Render a UTC instant as wall-clock time in the named timezone.
pub fn from_utc(instant: DateTime<Utc>, timezone: &str) -> CalendarResult<DateTime<Tz>> {
    let tz = resolve_timezone(timezone)?;
    Ok(utc_to_wall_clock(instant, &tz))
}

/// Convert wall-clock time in `tz` to UTC.
///
/// Ambiguous times (clocks turned back) resolve to the earlier instant.
/// Times inside a gap (clocks turned forward) use the offset in effect
/// before the transition, so they land after it.
pub fn wall_clock_to_utc(wall_clock: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&wall_clock) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // Any instant a day earlier is before the gap
            let before = Utc.from_utc_datetime(&(wall_clock - Duration::days(1)));
            let offset = tz.offset_from_utc_datetime(&before.naive_utc());
            let shifted = wall_clock - Duration::seconds(i64::from(offset.fix().local_minus_utc()));
            Utc.from_utc_datetime(&shifted)
        }
    }
}

/// Convert a UTC instant to wall-clock time in `tz`.
pub fn utc_to_wall_clock(instant: DateTime<Utc>, tz: &Tz) -> DateTime<Tz> {
    instant.with_timezone(tz)
}
