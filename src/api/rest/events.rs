//! Event endpoints
//!
//! Times in requests and responses are wall-clock time in the caller's
//! stored location.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use super::{ApiError, ApiResponse};
use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::calendar::EventQuery;
use crate::types::EventInput;

/// POST /events - Create an event
pub async fn add_event(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Json(input): Json<EventInput>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.calendar.create_event(&caller.username, input).await?;
    Ok((StatusCode::CREATED, ApiResponse::new(event)))
}

/// GET /events - Query events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Query(query): Query<EventQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let events = state.calendar.list_events(&caller.username, &query).await?;
    Ok(ApiResponse::new(events))
}

/// GET /events/:id - Fetch one event
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.calendar.get_event(&caller.username, id).await?;
    Ok(ApiResponse::new(event))
}

/// PUT /events/:id - Replace an event's fields
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(input): Json<EventInput>,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.calendar.update_event(&caller.username, id, input).await?;
    Ok(ApiResponse::new(event))
}

/// DELETE /events/:id - Delete an event
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.calendar.delete_event(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
