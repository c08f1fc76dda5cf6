//! Storage backends
//!
//! Two contracts live here:
//! - `EventStore`: CRUD and filtering over events
//! - `UserStore`: credentials and per-user timezone
//!
//! Every event backend filters through `EventParams::apply`, so the matching
//! rules are written once and shared.
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ ArrayEventStore  │   │  MapEventStore   │   │  SqlEventStore   │
//! │ Mutex<Vec>       │   │ Mutex<BTreeMap>  │   │ SqlitePool       │
//! └────────┬─────────┘   └────────┬─────────┘   └────────┬─────────┘
//!          └──────────────► EventParams::apply ◄─────────┘
//! ```

mod array;
mod map;
mod sql;
mod sql_users;
mod users;

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::{hash_password, verify_password, PasswordHasher};
use crate::types::{CalendarError, CalendarResult, Credential, Event, EventParams};
use crate::validation::require_field;

pub use array::ArrayEventStore;
pub use map::MapEventStore;
pub use sql::{connect_sqlite, SqlEventStore};
pub use sql_users::SqlUserStore;
pub use users::InMemoryUserStore;

/// Storage contract for events.
///
/// Callers always receive copies; the store keeps the canonical record.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event, assigning the next id.
    async fn add(&self, event: Event) -> CalendarResult<Event>;

    /// Every event matching all non-wildcard fields of `params`.
    async fn get(&self, params: &EventParams) -> CalendarResult<Vec<Event>>;

    async fn get_by_id(&self, id: i64) -> CalendarResult<Event>;

    /// Replace the mutable fields of the event with this id.
    async fn update(&self, id: i64, event: Event) -> CalendarResult<Event>;

    /// Remove the event with the same id as `event`.
    async fn delete(&self, event: &Event) -> CalendarResult<()>;

    /// Most recently assigned id, 0 before the first add
    fn last_used_id(&self) -> i64;

    /// Remove every event. Ids keep counting from where they were.
    async fn clear_repo_data(&self) -> CalendarResult<()>;
}

/// Storage contract for user credentials.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Hasher used for new passwords and credential checks
    fn hasher(&self) -> Arc<dyn PasswordHasher>;

    async fn add_user(
        &self,
        username: &str,
        password: &str,
        timezone: &str,
    ) -> CalendarResult<Credential>;

    async fn get_user(&self, username: &str) -> CalendarResult<Credential>;

    async fn update_location(&self, username: &str, timezone: &str) -> CalendarResult<Credential>;

    async fn clear_repo_data(&self) -> CalendarResult<()>;

    /// Verify a username/password pair.
    ///
    /// An unknown user and a wrong password produce the same error, and both
    /// pay for one bcrypt verification.
    async fn check_credentials(&self, username: &str, password: &str) -> CalendarResult<()> {
        let stored_hash = match self.get_user(username).await {
            Ok(credential) => Some(credential.password_hash),
            Err(CalendarError::NoMatch) => None,
            Err(e) => return Err(e),
        };

        if verify_password(self.hasher(), password, stored_hash).await? {
            Ok(())
        } else {
            Err(CalendarError::InvalidCredentials)
        }
    }
}

/// Shared handle to an event store
pub type SharedEventStore = Arc<dyn EventStore>;

/// Shared handle to a user store
pub type SharedUserStore = Arc<dyn UserStore>;

/// Validate registration input and build the credential to persist.
pub(crate) async fn new_credential(
    hasher: Arc<dyn PasswordHasher>,
    username: &str,
    password: &str,
    timezone: &str,
) -> CalendarResult<Credential> {
    let username = require_field(username, "username")?;
    if password.is_empty() {
        return Err(CalendarError::MissingField { field: "password" });
    }
    let location = require_field(timezone, "location")?;
    crate::utils::time::resolve_timezone(location)?;

    Ok(Credential {
        username: username.to_string(),
        password_hash: hash_password(hasher, password).await?,
        location: location.to_string(),
    })
}
