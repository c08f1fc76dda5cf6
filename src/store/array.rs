//! Event store backed by a vector

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::EventStore;
use crate::types::{CalendarError, CalendarResult, Event, EventParams};

#[derive(Debug, Default)]
struct Inner {
    /// Kept in insertion order, which is also id order
    events: Vec<Event>,
    last_id: i64,
}

/// In-memory event store keeping events in a `Vec`.
#[derive(Debug, Default)]
pub struct ArrayEventStore {
    inner: Mutex<Inner>,
}

impl ArrayEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events
    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventStore for ArrayEventStore {
    async fn add(&self, mut event: Event) -> CalendarResult<Event> {
        event.check_invariants()?;

        let mut inner = self.inner.lock();
        inner.last_id += 1;
        event.id = inner.last_id;
        inner.events.push(event.clone());

        debug!(id = event.id, name = %event.name, "event added");
        Ok(event)
    }

    async fn get(&self, params: &EventParams) -> CalendarResult<Vec<Event>> {
        let inner = self.inner.lock();
        Ok(params.apply(inner.events.iter().cloned()))
    }

    async fn get_by_id(&self, id: i64) -> CalendarResult<Event> {
        let inner = self.inner.lock();
        inner
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(CalendarError::NoMatch)
    }

    async fn update(&self, id: i64, event: Event) -> CalendarResult<Event> {
        event.check_invariants()?;

        let mut inner = self.inner.lock();
        let stored = inner
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(CalendarError::NoMatch)?;
        stored.replace_fields(event);

        debug!(id, "event updated");
        Ok(stored.clone())
    }

    async fn delete(&self, event: &Event) -> CalendarResult<()> {
        let mut inner = self.inner.lock();
        let index = inner
            .events
            .iter()
            .position(|e| e.id == event.id)
            .ok_or(CalendarError::NoMatch)?;
        inner.events.remove(index);

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
