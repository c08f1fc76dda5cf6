//! Event queries in the caller's timezone

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use crate::store::SharedEventStore;
use crate::types::{sort_by_start, CalendarResult, EventParams, LocalEvent};
use crate::utils::time::resolve_timezone;
use crate::validation::{parse_date_part, parse_flag, parse_instant};

/// Raw filter values as they arrive in a query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventQuery {
    pub day: Option<String>,
    pub week: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    pub name: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub sorting: Option<String>,
}

impl EventQuery {
    /// Query with no filters
    pub fn all() -> Self {
        Self::default()
    }

    pub fn sorted(mut self) -> Self {
        self.sorting = Some("true".to_string());
        self
    }
}

/// Turns raw queries into `EventParams` and renders the results locally.
#[derive(Clone)]
pub struct EventQueryEngine {
    store: SharedEventStore,
}

impl EventQueryEngine {
    pub fn new(store: SharedEventStore) -> Self {
        Self { store }
    }

    /// Parse and validate a raw query.
    ///
    /// Offset-less `start`/`end` values are wall-clock time in `tz`.
    pub fn parse_params(query: &EventQuery, tz: &Tz) -> CalendarResult<EventParams> {
        let mut params = EventParams {
            day: parse_date_part(query.day.as_deref(), "day")?,
            week: parse_date_part(query.week.as_deref(), "week")?,
            month: parse_date_part(query.month.as_deref(), "month")?,
            year: parse_date_part(query.year.as_deref(), "year")?,
            name: query.name.as_deref().map(str::trim).unwrap_or_default().to_string(),
            sorting: parse_flag(query.sorting.as_deref()),
            ..Default::default()
        };

        if let Some(start) = query.start.as_deref().filter(|s| !s.trim().is_empty()) {
            params.start = parse_instant(start, "start", tz)?;
        }
        if let Some(end) = query.end.as_deref().filter(|s| !s.trim().is_empty()) {
            params.end = parse_instant(end, "end", tz)?;
        }

        Ok(params)
    }

    /// Matching events rendered in `timezone`.
    pub async fn query(
        &self,
        query: &EventQuery,
        timezone: &str,
    ) -> CalendarResult<Vec<LocalEvent>> {
        let tz = resolve_timezone(timezone)?;
        let params = Self::parse_params(query, &tz)?;

        let mut events = self.store.get(&params).await?;
        if params.sorting {
            sort_by_start(&mut events);
        }
        debug!(count = events.len(), timezone, "events queried");

        Ok(events.iter().map(|e| e.localize(&tz)).collect())
    }

    pub async fn get_by_id(&self, id: i64, timezone: &str) -> CalendarResult<LocalEvent> {
        let tz = resolve_timezone(timezone)?;
        let event = self.store.get_by_id(id).await?;
        Ok(event.localize(&tz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::store::{ArrayEventStore, EventStore};
    use crate::types::{CalendarError, Event};

    fn raw(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_parse_params_reads_every_field() {
        let query = EventQuery {
            day: raw("10"),
            week: raw("2"),
            month: raw("1"),
            year: raw("2023"),
            name: raw(" Standup "),
            start: raw("2023-01-10T09:00:00"),
            end: raw("2023-01-10T10:00:00Z"),
            sorting: raw("yes"),
        };
        let params =
            EventQueryEngine::parse_params(&query, &chrono_tz::America::New_York).unwrap();

        assert_eq!((params.day, params.week, params.month, params.year), (10, 2, 1, 2023));
        assert_eq!(params.name, "Standup");
        // Offset-less start is New York wall-clock
        assert_eq!(params.start, Utc.with_ymd_and_hms(2023, 1, 10, 14, 0, 0).unwrap());
        // Explicit offset is absolute
        assert_eq!(params.end, Utc.with_ymd_and_hms(2023, 1, 10, 10, 0, 0).unwrap());
        assert!(params.sorting);
    }

    #[test]
    fn test_parse_params_rejects_bad_date_parts() {
        let negative = EventQuery { day: raw("-1"), ..Default::default() };
        let err = EventQueryEngine::parse_params(&negative, &Tz::UTC).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidParams(msg) if msg.contains("negative")));

        let garbage = EventQuery { month: raw("june"), ..Default::default() };
        assert!(EventQueryEngine::parse_params(&garbage, &Tz::UTC).is_err());

        let empty = EventQuery { day: raw(""), ..Default::default() };
        assert!(EventQueryEngine::parse_params(&empty, &Tz::UTC).unwrap().is_wildcard());
    }

    #[tokio::test]
    async fn test_query_localizes_and_sorts() {
        let store = Arc::new(ArrayEventStore::new());
        let t = |h| Utc.with_ymd_and_hms(2023, 1, 10, h, 0, 0).unwrap();
        store.add(Event::new("Late", t(16), t(17))).await.unwrap();
        store.add(Event::new("Early", t(14), t(15))).await.unwrap();

        let engine = EventQueryEngine::new(store);
        let events = engine
            .query(&EventQuery::all().sorted(), "America/New_York")
            .await
            .unwrap();

        let names: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Early", "Late"]);
        assert_eq!(events[0].start.to_rfc3339(), "2023-01-10T09:00:00-05:00");

        let unknown = engine.query(&EventQuery::all(), "Atlantis/Deep").await.unwrap_err();
        assert!(matches!(unknown, CalendarError::UnknownTimezone(_)));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = Arc::new(ArrayEventStore::new());
        let start = Utc.with_ymd_and_hms(2023, 7, 1, 12, 0, 0).unwrap();
        let added = store.add(Event::new("Picnic", start, start)).await.unwrap();

        let engine = EventQueryEngine::new(store);
        let local = engine.get_by_id(added.id, "Europe/Berlin").await.unwrap();
        assert_eq!(local.start.to_rfc3339(), "2023-07-01T14:00:00+02:00");
        assert!(matches!(engine.get_by_id(42, "UTC").await, Err(CalendarError::NoMatch)));
    }
}
