//! Calendar - user-facing operations
//!
//! `Calendar` ties the stores together: it resolves each user's timezone and
//! hands it to the query engine and lifecycle, which do the actual work.

mod lifecycle;
mod query;

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{BcryptHasher, PasswordHasher};
use crate::config::{Settings, StorageBackend};
use crate::store::{
    connect_sqlite, ArrayEventStore, InMemoryUserStore, MapEventStore, SharedEventStore,
    SharedUserStore, SqlEventStore, SqlUserStore,
};
use crate::types::{CalendarError, CalendarResult, Credential, EventInput, LocalEvent, NewUser};
use crate::utils::time::resolve_timezone;

pub use lifecycle::EventLifecycle;
pub use query::{EventQuery, EventQueryEngine};

/// Calendar service over an event store and a user store
#[derive(Clone)]
pub struct Calendar {
    events: SharedEventStore,
    users: SharedUserStore,
    engine: EventQueryEngine,
    lifecycle: EventLifecycle,
}

impl Calendar {
    pub fn new(events: SharedEventStore, users: SharedUserStore) -> Self {
        Self {
            engine: EventQueryEngine::new(events.clone()),
            lifecycle: EventLifecycle::new(events.clone()),
            events,
            users,
        }
    }

    /// Build the stores named by `settings` and wrap them in a calendar.
    pub async fn from_settings(settings: &Settings) -> CalendarResult<Self> {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptHasher::new(settings.bcrypt_cost));

        let (events, users): (SharedEventStore, SharedUserStore) = match settings.storage {
            StorageBackend::Array => {
                let events: SharedEventStore = Arc::new(ArrayEventStore::new());
                let users: SharedUserStore = Arc::new(InMemoryUserStore::new(hasher));
                (events, users)
            }
            StorageBackend::Map => {
                let events: SharedEventStore = Arc::new(MapEventStore::new());
                let users: SharedUserStore = Arc::new(InMemoryUserStore::new(hasher));
                (events, users)
            }
            StorageBackend::Sql => {
                let pool = connect_sqlite(&settings.database_url).await?;
                let events: SharedEventStore = Arc::new(SqlEventStore::new(pool.clone()).await?);
                let users: SharedUserStore = Arc::new(SqlUserStore::new(pool, hasher).await?);
                (events, users)
            }
        };

        info!(storage = %settings.storage, "calendar stores ready");
        Ok(Self::new(events, users))
    }

    pub fn events(&self) -> &SharedEventStore {
        &self.events
    }

    pub async fn register(&self, user: NewUser) -> CalendarResult<Credential> {
        let credential = self
            .users
            .add_user(&user.username, &user.password, &user.location)
            .await?;
        info!(
            username = %credential.username,
            location = %credential.location,
            "user registered"
        );
        Ok(credential)
    }

    /// Check a username/password pair and return the stored credential.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> CalendarResult<Credential> {
        if let Err(e) = self.users.check_credentials(username, password).await {
            if matches!(e, CalendarError::InvalidCredentials) {
                warn!(username, "rejected credentials");
            }
            return Err(e);
        }
        self.users.get_user(username).await
    }

    pub async fn change_location(
        &self,
        username: &str,
        timezone: &str,
    ) -> CalendarResult<Credential> {
        let credential = self.users.update_location(username, timezone).await?;
        info!(username, timezone, "user location changed");
        Ok(credential)
    }

    /// Timezone name stored for `username`
    async fn location(&self, username: &str) -> CalendarResult<String> {
        Ok(self.users.get_user(username).await?.location)
    }

    pub async fn create_event(
        &self,
        username: &str,
        input: EventInput,
    ) -> CalendarResult<LocalEvent> {
        let location = self.location(username).await?;
        let event = self.lifecycle.create(&location, input).await?;
        Ok(event.localize(&resolve_timezone(&location)?))
    }

    pub async fn update_event(
        &self,
        username: &str,
        id: i64,
        input: EventInput,
    ) -> CalendarResult<LocalEvent> {
        let location = self.location(username).await?;
        let event = self.lifecycle.update(id, &location, input).await?;
        Ok(event.localize(&resolve_timezone(&location)?))
    }

    pub async fn delete_event(&self, id: i64) -> CalendarResult<()> {
        self.lifecycle.delete(id).await
    }

    pub async fn get_event(&self, username: &str, id: i64) -> CalendarResult<LocalEvent> {
        let location = self.location(username).await?;
        self.engine.get_by_id(id, &location).await
    }

    pub async fn list_events(
        &self,
        username: &str,
        query: &EventQuery,
    ) -> CalendarResult<Vec<LocalEvent>> {
        let location = self.location(username).await?;
        self.engine.query(query, &location).await
    }
}
