//! Utility functions and helpers
//!
//! This module contains the timezone conversion helpers.

pub mod time;

pub use time::{from_utc, resolve_timezone, to_utc, utc_to_wall_clock, wall_clock_to_utc};
