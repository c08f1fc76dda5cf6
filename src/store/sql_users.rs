//! User store backed by SQLite

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use tracing::debug;

use super::sql::{connect_sqlite, map_write_error};
use super::{new_credential, UserStore};
use crate::auth::{BcryptHasher, PasswordHasher};
use crate::types::{CalendarError, CalendarResult, Credential};
use crate::utils::time::resolve_timezone;

const USERS_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY NOT NULL,
    password_hash TEXT NOT NULL,
    location TEXT NOT NULL
)";

#[derive(Debug, FromRow)]
struct UserRow {
    username: String,
    password_hash: String,
    location: String,
}

impl From<UserRow> for Credential {
    fn from(row: UserRow) -> Self {
        Credential {
            username: row.username,
            password_hash: row.password_hash,
            location: row.location,
        }
    }
}

/// SQL-backed user store
pub struct SqlUserStore {
    pool: SqlitePool,
    hasher: Arc<dyn PasswordHasher>,
}

impl SqlUserStore {
    pub async fn new(pool: SqlitePool, hasher: Arc<dyn PasswordHasher>) -> CalendarResult<Self> {
        Self::init_schema(&pool).await?;
        Ok(Self { pool, hasher })
    }

    /// Connect to `url` with the default bcrypt hasher
    pub async fn connect(url: &str) -> CalendarResult<Self> {
        Self::new(connect_sqlite(url).await?, Arc::new(BcryptHasher::default())).await
    }

    pub async fn init_schema(pool: &SqlitePool) -> CalendarResult<()> {
        sqlx::query(USERS_SCHEMA).execute(pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    fn hasher(&self) -> Arc<dyn PasswordHasher> {
        self.hasher.clone()
    }

    async fn add_user(
        &self,
        username: &str,
        password: &str,
        timezone: &str,
    ) -> CalendarResult<Credential> {
        let credential =
            new_credential(self.hasher.clone(), username, password, timezone).await?;

        sqlx::query("INSERT INTO users (username, password_hash, location) VALUES (?, ?, ?)")
            .bind(&credential.username)
            .bind(&credential.password_hash)
            .bind(&credential.location)
            .execute(&self.pool)
            .await
            .map_err(|e| match map_write_error(e) {
                CalendarError::Duplicate(_) => CalendarError::Duplicate(format!(
                    "user with username [{}] already exists",
                    credential.username
                )),
                other => other,
            })?;

        debug!(username = %credential.username, "user added");
        Ok(credential)
    }

    async fn get_user(&self, username: &str) -> CalendarResult<Credential> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT username, password_hash, location FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Credential::from).ok_or(CalendarError::NoMatch)
    }

    async fn update_location(&self, username: &str, timezone: &str) -> CalendarResult<Credential> {
        resolve_timezone(timezone)?;

        let result = sqlx::query("UPDATE users SET location = ? WHERE username = ?")
            .bind(timezone)
            .bind(username)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CalendarError::NoMatch);
        }
        debug!(username, timezone, "user location updated");

        self.get_user(username).await
    }

    async fn clear_repo_data(&self) -> CalendarResult<()> {
        sqlx::query("DELETE FROM users").execute(&self.pool).await?;
        Ok(())
    }
}
