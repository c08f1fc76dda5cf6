//! Creating, updating and deleting events from raw input

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::store::SharedEventStore;
use crate::types::{unset_instant, CalendarError, CalendarResult, Event, EventInput};
use crate::utils::time::{resolve_timezone, wall_clock_to_utc};
use crate::validation::{parse_wall_clock, require_field};

/// Validates raw event input and writes it to the event store.
#[derive(Clone)]
pub struct EventLifecycle {
    store: SharedEventStore,
}

impl EventLifecycle {
    pub fn new(store: SharedEventStore) -> Self {
        Self { store }
    }

    /// Build a UTC event from input written in `timezone`.
    ///
    /// Fails before touching the store, so a rejected event consumes no id.
    pub fn build_event(timezone: &str, input: &EventInput) -> CalendarResult<Event> {
        let name = require_field(&input.name, "name")?;
        let start = require_field(&input.start, "start")?;
        let end = require_field(&input.end, "end")?;
        let tz = resolve_timezone(timezone)?;

        let event = Event {
            id: 0,
            name: name.to_string(),
            start: to_instant(start, "start", &tz)?,
            end: to_instant(end, "end", &tz)?,
            description: input.description.clone(),
            alert: match input.alert.trim() {
                "" => unset_instant(),
                alert => to_instant(alert, "alert", &tz)?,
            },
        };

        if event.start > event.end {
            return Err(CalendarError::InvalidRange);
        }
        Ok(event)
    }

    pub async fn create(&self, timezone: &str, input: EventInput) -> CalendarResult<Event> {
        let event = Self::build_event(timezone, &input)?;
        let event = self.store.add(event).await?;
        info!(id = event.id, name = %event.name, "event created");
        Ok(event)
    }

    pub async fn update(
        &self,
        id: i64,
        timezone: &str,
        input: EventInput,
    ) -> CalendarResult<Event> {
        let event = Self::build_event(timezone, &input)?;
        let event = self.store.update(id, event).await?;
        info!(id, "event updated");
        Ok(event)
    }

    pub async fn delete(&self, id: i64) -> CalendarResult<()> {
        let event = self.store.get_by_id(id).await?;
        self.store.delete(&event).await?;
        info!(id, "event deleted");
        Ok(())
    }
}

fn to_instant(raw: &str, field: &str, tz: &Tz) -> CalendarResult<DateTime<Utc>> {
    Ok(wall_clock_to_utc(parse_wall_clock(raw, field)?, tz))
}
