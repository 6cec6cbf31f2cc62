//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::web::{auth::verify_token, errors::reject, state::AppState};

/// Middleware that validates the bearer access token and extracts the user_id.
///
/// If valid, inserts the user_id into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    // 1. Extract the bearer token
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(token) = token else {
        return reject(StatusCode::UNAUTHORIZED, "Missing authorization token").into_response();
    };

    // 2. Verify the token, get user_id
    let Some(user_id) = verify_token(&state.config.jwt_secret, token) else {
        warn!("Rejected request with an invalid access token");
        return reject(StatusCode::UNAUTHORIZED, "Invalid or expired token").into_response();
    };

    // 3. Insert user_id into request extensions and continue to the handler
    req.extensions_mut().insert(user_id);
    next.run(req).await
}
