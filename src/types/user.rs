//! User credential types

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::CalendarResult;
use crate::utils::time::resolve_timezone;

/// Stored credential for a registered user.
///
/// The password hash never leaves the process through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credential {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// IANA timezone name
    pub location: String,
}

impl Credential {
    /// Resolve the user's timezone
    pub fn timezone(&self) -> CalendarResult<Tz> {
        resolve_timezone(&self.location)
    }
}

/// Registration request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub location: String,
}
