//! HTTP Basic authentication

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use super::rest::ApiError;
use super::AppState;
use crate::auth::BasicCredentials;
use crate::types::Credential;

/// Credential of the authenticated caller, stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthUser(pub Credential);

/// Reject requests without valid Basic credentials.
pub async fn require_basic_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credentials = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(BasicCredentials::from_header)
        .ok_or_else(|| ApiError::unauthorized("missing basic credentials"))?;

    let credential = state
        .calendar
        .authenticate(&credentials.username, &credentials.password)
        .await?;

    req.extensions_mut().insert(AuthUser(credential));
    Ok(next.run(req).await)
}
