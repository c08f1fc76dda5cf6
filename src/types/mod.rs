//! Data types for the calendar service
//!
//! This module contains the core data structures shared by the stores, the
//! query engine and the HTTP layer.

mod error;
mod event;
mod params;
mod user;

use chrono::{DateTime, Utc};

pub use error::{BackendError, CalendarError};
pub use event::{Event, EventInput, LocalEvent};
pub use params::{sort_by_start, EventParams};
pub use user::{Credential, NewUser};

/// Result type for calendar operations
pub type CalendarResult<T> = Result<T, CalendarError>;

/// 0001-01-01T00:00:00Z in microseconds since the Unix epoch
pub const UNSET_MICROS: i64 = -62_135_596_800_000_000;

/// The zero instant (0001-01-01T00:00:00Z) used as the "unset" sentinel for timestamps
pub fn unset_instant() -> DateTime<Utc> {
    DateTime::from_timestamp_micros(UNSET_MICROS).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Check if a timestamp is the unset sentinel
pub fn is_unset(instant: &DateTime<Utc>) -> bool {
    *instant == unset_instant()
}
