//! Runtime settings read from `CALENDAR_*` environment variables

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::types::{CalendarError, CalendarResult};

/// Which event/user store pair the server runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Array,
    Map,
    Sql,
}

impl FromStr for StorageBackend {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" => Ok(StorageBackend::Array),
            "map" => Ok(StorageBackend::Map),
            "sql" | "sqlite" => Ok(StorageBackend::Sql),
            other => Err(CalendarError::Config(format!(
                "unknown storage backend '{}', expected array, map or sql",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::Array => "array",
            StorageBackend::Map => "map",
            StorageBackend::Sql => "sql",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub storage: StorageBackend,
    /// Only used by the sql backend
    pub database_url: String,
    pub bcrypt_cost: u32,
    /// Default `tracing` filter when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            storage: StorageBackend::Sql,
            database_url: "sqlite://calendar.db?mode=rwc".to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> CalendarResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> CalendarResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get("CALENDAR_ADDR") {
            settings.addr = addr.trim().parse().map_err(|_| {
                CalendarError::Config(format!("CALENDAR_ADDR is not a socket address: {}", addr))
            })?;
        }
        if let Some(storage) = get("CALENDAR_STORAGE") {
            settings.storage = storage.parse()?;
        }
        if let Some(url) = get("CALENDAR_DATABASE_URL") {
            settings.database_url = url;
        }
        if let Some(cost) = get("CALENDAR_BCRYPT_COST") {
            settings.bcrypt_cost = cost
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|c| (4..=31).contains(c))
                .ok_or_else(|| {
                    CalendarError::Config(format!(
                        "CALENDAR_BCRYPT_COST must be between 4 and 31, got {}",
                        cost
                    ))
                })?;
        }
        if let Some(filter) = get("CALENDAR_LOG") {
            settings.log_filter = filter;
        }

        Ok(settings)
    }
}
