//! Event store backed by an ordered map keyed by id

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::EventStore;
use crate::types::{CalendarError, CalendarResult, Event, EventParams};

#[derive(Debug, Default)]
struct Inner {
    events: BTreeMap<i64, Event>,
    last_id: i64,
}

/// In-memory event store keeping events in a map keyed by id.
///
/// Iteration follows id order, so unsorted results come back in insertion order.
#[derive(Debug, Default)]
pub struct MapEventStore {
    inner: Mutex<Inner>,
}

impl MapEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventStore for MapEventStore {
    async fn add(&self, mut event: Event) -> CalendarResult<Event> {
        event.check_invariants()?;

        let mut inner = self.inner.lock();
        inner.last_id += 1;
        let id = inner.last_id;
        event.id = id;
        inner.events.insert(id, event.clone());

        debug!(id, name = %event.name, "event added");
        Ok(event)
    }

    async fn get(&self, params: &EventParams) -> CalendarResult<Vec<Event>> {
        let inner = self.inner.lock();
        Ok(params.apply(inner.events.values().cloned()))
    }

    async fn get_by_id(&self, id: i64) -> CalendarResult<Event> {
        self.inner
            .lock()
            .events
            .get(&id)
            .cloned()
            .ok_or(CalendarError::NoMatch)
    }

    async fn update(&self, id: i64, event: Event) -> CalendarResult<Event> {
        event.check_invariants()?;

        let mut inner = self.inner.lock();
        let stored = inner.events.get_mut(&id).ok_or(CalendarError::NoMatch)?;
        stored.replace_fields(event);

        debug!(id, "event updated");
        Ok(stored.clone())
    }

    async fn delete(&self, event: &Event) -> CalendarResult<()> {
        self.inner
            .lock()
            .events
            .remove(&event.id)
            .ok_or(CalendarError::NoMatch)?;

        debug!(id = event.id, "event deleted");
        Ok(())
    }

    fn last_used_id(&self) -> i64 {
        self.inner.lock().last_id
    }

    async fn clear_repo_data(&self) -> CalendarResult<()> {
        self.inner.lock().events.clear();
        Ok(())
    }
}
