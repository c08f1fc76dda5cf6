//! User endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;

use super::{ApiError, ApiResponse};
use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::types::NewUser;

/// POST /users - Register a new user
pub async fn add_user(
    State(state): State<Arc<AppState>>,
    Json(user): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let credential = state.calendar.register(user).await?;
    Ok((StatusCode::CREATED, ApiResponse::new(credential)))
}

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    #[serde(default)]
    pub location: String,
}

/// PUT /users/:username?location= - Change the caller's timezone
pub async fn change_location(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(username): Path<String>,
    Query(params): Query<LocationParams>,
) -> Result<impl IntoResponse, ApiError> {
    if caller.username != username {
        return Err(ApiError::forbidden("users may only change their own location"));
    }
    if params.location.trim().is_empty() {
        return Err(ApiError::bad_request("location query parameter is required"));
    }

    let credential = state
        .calendar
        .change_location(&username, params.location.trim())
        .await?;
    Ok(ApiResponse::new(credential))
}
