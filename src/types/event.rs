//! Event types

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::{is_unset, unset_instant, CalendarError, CalendarResult};
use crate::utils::time::utc_to_wall_clock;

/// Calendar event as stored: every timestamp is a UTC instant.
///
/// `alert` uses the zero instant (see [`unset_instant`]) for "no alert".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "unset_instant")]
    pub alert: DateTime<Utc>,
}

impl Default for Event {
    fn default() -> Self {
        Self::new(String::new(), unset_instant(), unset_instant())
    }
}

impl Event {
    /// Create an event without description or alert
    pub fn new(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            start,
            end,
            description: String::new(),
            alert: unset_instant(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_alert(mut self, alert: DateTime<Utc>) -> Self {
        self.alert = alert;
        self
    }

    /// Whether an alert time has been set
    pub fn has_alert(&self) -> bool {
        !is_unset(&self.alert)
    }

    /// Check the invariants every persisted event must hold.
    pub fn check_invariants(&self) -> CalendarResult<()> {
        if self.name.is_empty() {
            return Err(CalendarError::MissingField { field: "name" });
        }
        if is_unset(&self.start) {
            return Err(CalendarError::MissingField { field: "start" });
        }
        if is_unset(&self.end) {
            return Err(CalendarError::MissingField { field: "end" });
        }
        if self.start > self.end {
            return Err(CalendarError::InvalidRange);
        }
        Ok(())
    }

    /// Copy the mutable fields of `other` into this event, keeping the id.
    pub(crate) fn replace_fields(&mut self, other: Event) {
        self.name = other.name;
        self.start = other.start;
        self.end = other.end;
        self.description = other.description;
        self.alert = other.alert;
    }

    /// Render the event in the given timezone.
    ///
    /// An unset alert keeps the zero sentinel instead of being shifted.
    pub fn localize(&self, tz: &Tz) -> LocalEvent {
        let alert = if self.has_alert() {
            utc_to_wall_clock(self.alert, tz)
        } else {
            self.alert.with_timezone(&Tz::UTC)
        };

        LocalEvent {
            id: self.id,
            name: self.name.clone(),
            start: utc_to_wall_clock(self.start, tz),
            end: utc_to_wall_clock(self.end, tz),
            description: self.description.clone(),
            alert,
        }
    }
}

/// Event rendered in a caller's timezone
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalEvent {
    pub id: i64,
    pub name: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub description: String,
    pub alert: DateTime<Tz>,
}

impl LocalEvent {
    pub fn has_alert(&self) -> bool {
        !is_unset(&self.alert.with_timezone(&Utc))
    }
}

/// Raw event fields as supplied by a caller.
///
/// Timestamps are strings read as wall-clock time in the caller's timezone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub alert: String,
}

impl EventInput {
    pub fn new(name: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: start.into(),
            end: end.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_alert(mut self, alert: impl Into<String>) -> Self {
        self.alert = alert.into();
        self
    }
}
