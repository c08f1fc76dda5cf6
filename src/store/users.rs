//! In-memory user store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::{new_credential, UserStore};
use crate::auth::{BcryptHasher, PasswordHasher};
use crate::types::{CalendarError, CalendarResult, Credential};
use crate::utils::time::resolve_timezone;

/// User store keeping credentials in a map keyed by username
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, Credential>>,
    hasher: Arc<dyn PasswordHasher>,
}

impl InMemoryUserStore {
    pub fn new(hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            hasher,
        }
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.users.read().len()
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new(Arc::new(BcryptHasher::default()))
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    fn hasher(&self) -> Arc<dyn PasswordHasher> {
        self.hasher.clone()
    }

    async fn add_user(
        &self,
        username: &str,
        password: &str,
        timezone: &str,
    ) -> CalendarResult<Credential> {
        if self.users.read().contains_key(username.trim()) {
            return Err(CalendarError::Duplicate(format!(
                "user with username [{}] already exists",
                username.trim()
            )));
        }

        // Hash outside the lock, then re-check on insert
        let credential =
            new_credential(self.hasher.clone(), username, password, timezone).await?;

        let mut users = self.users.write();
        if users.contains_key(&credential.username) {
            return Err(CalendarError::Duplicate(format!(
                "user with username [{}] already exists",
                credential.username
            )));
        }
        users.insert(credential.username.clone(), credential.clone());

        debug!(username = %credential.username, "user added");
        Ok(credential)
    }

    async fn get_user(&self, username: &str) -> CalendarResult<Credential> {
        self.users
            .read()
            .get(username)
            .cloned()
            .ok_or(CalendarError::NoMatch)
    }

    async fn update_location(&self, username: &str, timezone: &str) -> CalendarResult<Credential> {
        resolve_timezone(timezone)?;

        let mut users = self.users.write();
        let credential = users.get_mut(username).ok_or(CalendarError::NoMatch)?;
        credential.location = timezone.to_string();

        debug!(username, timezone, "user location updated");
        Ok(credential.clone())
    }

    async fn clear_repo_data(&self) -> CalendarResult<()> {
        self.users.write().clear();
        Ok(())
    }
}
