//! Calendar Service
//!
//! Stores calendar events as UTC instants and serves them to each user in
//! that user's own IANA timezone.
//!
//! # Features
//!
//! - **Three event backends**: vector, ordered map and SQLite, one contract
//! - **Timezone aware**: wall-clock input and output per user, DST handled
//! - **Filtering**: day, ISO week, month, year, name, exact start/end
//! - **Basic auth**: bcrypt-hashed credentials
//!
//! # Modules
//!
//! - `types`: Core data structures (Event, EventParams, Credential, errors)
//! - `store`: `EventStore` / `UserStore` contracts and their backends
//! - `calendar`: Query engine, event lifecycle and the `Calendar` facade
//! - `validation`: Parsing of raw caller input
//! - `auth`: Password hashing and Basic credentials
//! - `utils`: Timezone conversion
//! - `config`: Settings from the environment
//! - `api`: axum HTTP router
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use calendar_service::store::{ArrayEventStore, InMemoryUserStore};
//! use calendar_service::{Calendar, EventInput, NewUser};
//!
//! # async fn run() -> calendar_service::CalendarResult<()> {
//! let calendar = Calendar::new(
//!     Arc::new(ArrayEventStore::new()),
//!     Arc::new(InMemoryUserStore::default()),
//! );
//! calendar
//!     .register(NewUser {
//!         username: "alice".into(),
//!         password: "secret".into(),
//!         location: "Europe/Berlin".into(),
//!     })
//!     .await?;
//! let input = EventInput::new("Standup", "2023-01-10T09:00:00", "2023-01-10T09:15:00");
//! let event = calendar.create_event("alice", input).await?;
//! assert_eq!(event.id, 1);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod store;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at crate root
pub use calendar::{Calendar, EventLifecycle, EventQuery, EventQueryEngine};
pub use config::{Settings, StorageBackend};
pub use store::{EventStore, UserStore};
pub use types::{
    BackendError, CalendarError, CalendarResult, Credential, Event, EventInput, EventParams,
    LocalEvent, NewUser,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
