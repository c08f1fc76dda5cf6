//! Event store backed by SQLite through sqlx
//!
//! Timestamps are stored as integer microseconds since the Unix epoch, so
//! values read back are UTC and compare exactly. The unset alert sentinel
//! (0001-01-01) is stored as `UNSET_MICROS`, so the epoch stays a real time.

use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::{debug, info};

use super::EventStore;
use crate::types::{is_unset, BackendError, CalendarError, CalendarResult, Event, EventParams};

const EVENTS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    start_at INTEGER NOT NULL,
    end_at INTEGER NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    alert_at INTEGER NOT NULL DEFAULT -62135596800000000
)";

const SELECT_EVENTS: &str =
    "SELECT id, name, start_at, end_at, description, alert_at FROM events";

/// Open a SQLite pool for the given URL.
///
/// In-memory databases are limited to one long-lived connection, since each
/// connection would otherwise see its own empty database.
pub async fn connect_sqlite(url: &str) -> CalendarResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");

    let pool = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    info!(url, "connected to sqlite");
    Ok(pool)
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: i64,
    name: String,
    start_at: i64,
    end_at: i64,
    description: String,
    alert_at: i64,
}

fn from_micros(micros: i64, column: &str, id: i64) -> CalendarResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| {
        BackendError::Corrupt(format!("event {}: {} out of range ({})", id, column, micros)).into()
    })
}

impl TryFrom<EventRow> for Event {
    type Error = CalendarError;

    fn try_from(row: EventRow) -> CalendarResult<Self> {
        Ok(Event {
            id: row.id,
            start: from_micros(row.start_at, "start_at", row.id)?,
            end: from_micros(row.end_at, "end_at", row.id)?,
            alert: from_micros(row.alert_at, "alert_at", row.id)?,
            name: row.name,
            description: row.description,
        })
    }
}

/// Unique violations become `Duplicate`, everything else is a backend failure.
pub(super) fn map_write_error(e: sqlx::Error) -> CalendarError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            CalendarError::Duplicate(db.message().to_string())
        }
        _ => e.into(),
    }
}

/// SQL-backed event store
pub struct SqlEventStore {
    pool: SqlitePool,
    last_id: AtomicI64,
}

impl SqlEventStore {
    /// Wrap a pool, creating the schema if needed and picking up the last id.
    pub async fn new(pool: SqlitePool) -> CalendarResult<Self> {
        Self::init_schema(&pool).await?;

        let last_id: Option<i64> =
            sqlx::query_scalar("SELECT seq FROM sqlite_sequence WHERE name = 'events'")
                .fetch_optional(&pool)
                .await?;

        Ok(Self {
            pool,
            last_id: AtomicI64::new(last_id.unwrap_or(0)),
        })
    }

    /// Connect to `url` and build the store
    pub async fn connect(url: &str) -> CalendarResult<Self> {
        Self::new(connect_sqlite(url).await?).await
    }

    pub async fn init_schema(pool: &SqlitePool) -> CalendarResult<()> {
        sqlx::query(EVENTS_SCHEMA).execute(pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of stored events
    pub async fn count(&self) -> CalendarResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?)
    }
}

#[async_trait]
impl EventStore for SqlEventStore {
    async fn add(&self, event: Event) -> CalendarResult<Event> {
        event.check_invariants()?;

        let result = sqlx::query(
            "INSERT INTO events (name, start_at, end_at, description, alert_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&event.name)
        .bind(event.start.timestamp_micros())
        .bind(event.end.timestamp_micros())
        .bind(&event.description)
        .bind(event.alert.timestamp_micros())
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        let id = result.last_insert_rowid();
        self.last_id.fetch_max(id, Ordering::SeqCst);
        debug!(id, name = %event.name, "event added");

        self.get_by_id(id).await
    }

    async fn get(&self, params: &EventParams) -> CalendarResult<Vec<Event>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_EVENTS);
        query.push(" WHERE 1 = 1");
        // Exact instants narrow the scan; the shared predicate still decides
        if !is_unset(&params.start) {
            query.push(" AND start_at = ").push_bind(params.start.timestamp_micros());
        }
        if !is_unset(&params.end) {
            query.push(" AND end_at = ").push_bind(params.end.timestamp_micros());
        }
        query.push(" ORDER BY id");

        let rows = query.build_query_as::<EventRow>().fetch_all(&self.pool).await?;
        let events = rows
            .into_iter()
            .map(Event::try_from)
            .collect::<CalendarResult<Vec<_>>>()?;

        Ok(params.apply(events))
    }

    async fn get_by_id(&self, id: i64) -> CalendarResult<Event> {
        let row: Option<EventRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_EVENTS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(CalendarError::NoMatch)?.try_into()
    }

    async fn update(&self, id: i64, event: Event) -> CalendarResult<Event> {
        event.check_invariants()?;

        let result = sqlx::query(
            "UPDATE events SET name = ?, start_at = ?, end_at = ?, description = ?, alert_at = ? \
             WHERE id = ?",
        )
        .bind(&event.name)
        .bind(event.start.timestamp_micros())
        .bind(event.end.timestamp_micros())
        .bind(&event.description)
        .bind(event.alert.timestamp_micros())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(CalendarError::NoMatch);
        }
        debug!(id, "event updated");

        self.get_by_id(id).await
    }

    async fn delete(&self, event: &Event) -> CalendarResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CalendarError::NoMatch);
        }
        debug!(id = event.id, "event deleted");
        Ok(())
    }

    fn last_used_id(&self) -> i64 {
        self.last_id.load(Ordering::SeqCst)
    }

    async fn clear_repo_data(&self) -> CalendarResult<()> {
        sqlx::query("DELETE FROM events").execute(&self.pool).await?;
        Ok(())
    }
}
