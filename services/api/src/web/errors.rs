//! services/api/src/web/errors.rs
//!
//! The JSON error body shared by every handler.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// What a handler returns when it rejects a request.
pub type HandlerError = (StatusCode, Json<ErrorBody>);

pub fn reject(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}
