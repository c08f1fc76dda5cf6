//! HTTP API
//!
//! axum router over a shared [`Calendar`], with Basic authentication on
//! everything except registration and health checks.

pub mod http;
pub mod middleware;
pub mod rest;

use crate::calendar::Calendar;

pub use http::create_router;

/// Shared state for all handlers
pub struct AppState {
    pub calendar: Calendar,
}

impl AppState {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }
}
