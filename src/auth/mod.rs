//! Authentication helpers
//!
//! - `password`: salted one-way password hashing behind a trait
//! - `basic`: HTTP Basic credential parsing

mod basic;
mod password;

pub use basic::BasicCredentials;
pub use password::{hash_password, verify_password, BcryptHasher, PasswordHasher};
