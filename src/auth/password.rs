//! Password hashing
//!
//! Passwords are only ever stored as salted bcrypt hashes and checked with
//! `bcrypt::verify`, never by comparing strings. Hashing is CPU-bound, so the
//! async helpers below run it on tokio's blocking pool.

use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use once_cell::sync::OnceCell;

use crate::types::{BackendError, CalendarResult};

/// One-way salted password hashing
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password
    fn hash(&self, plaintext: &str) -> CalendarResult<String>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, plaintext: &str, hash: &str) -> bool;

    /// Spend the same work as `verify` against a hash no password matches.
    ///
    /// Used when there is no stored hash, so unknown usernames cost as much
    /// as wrong passwords.
    fn verify_dummy(&self, plaintext: &str);
}

/// bcrypt-backed hasher
#[derive(Debug)]
pub struct BcryptHasher {
    cost: u32,
    dummy: OnceCell<String>,
}

impl BcryptHasher {
    /// Create a hasher with an explicit cost (4..=31)
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy: OnceCell::new(),
        }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> CalendarResult<String> {
        Ok(hash(plaintext, self.cost)?)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        // Malformed hashes count as a mismatch
        verify(plaintext, hash).unwrap_or(false)
    }

    fn verify_dummy(&self, plaintext: &str) {
        let dummy = self
            .dummy
            .get_or_try_init(|| hash("calendar-service-dummy", self.cost));
        if let Ok(dummy) = dummy {
            let _ = verify(plaintext, dummy);
        }
    }
}

/// Hash `plaintext` on the blocking pool.
pub async fn hash_password(
    hasher: Arc<dyn PasswordHasher>,
    plaintext: &str,
) -> CalendarResult<String> {
    let plaintext = plaintext.to_string();
    tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
        .await
        .map_err(BackendError::from)?
}

/// Verify `plaintext` against `hash` on the blocking pool.
///
/// Without a stored hash the dummy hash is checked instead and the result is
/// always `false`.
pub async fn verify_password(
    hasher: Arc<dyn PasswordHasher>,
    plaintext: &str,
    hash: Option<String>,
) -> CalendarResult<bool> {
    let plaintext = plaintext.to_string();
    let matched = tokio::task::spawn_blocking(move || match hash {
        Some(hash) => hasher.verify(&plaintext, &hash),
        None => {
            hasher.verify_dummy(&plaintext);
            false
        }
    })
    .await
    .map_err(BackendError::from)?;
    Ok(matched)
}
