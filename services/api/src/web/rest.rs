//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the memory, feed and like endpoints and the
//! master definition for the OpenAPI specification.

use crate::adapters::uploads::is_allowed_image;
use crate::web::auth::{LoginRequest, LoginResponse, MessageResponse, SignupRequest};
use crate::web::errors::{reject, ErrorBody, HandlerError};
use crate::web::insights::{
    DashboardFullResponse, DashboardMemory, DashboardResponse, InsightBody, InsightResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;
use whispers_core::{
    domain::{FeedEntry, LikeOutcome, NewMemory},
    error::InsightError,
    ports::PortError,
    InsightRequest,
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::insights::ai_insight_handler,
        crate::web::insights::dashboard_handler,
        crate::web::insights::dashboard_full_handler,
        upload_memory_handler,
        feed_handler,
        like_handler,
    ),
    components(
        schemas(
            SignupRequest, LoginRequest, LoginResponse, MessageResponse, ErrorBody,
            InsightBody, InsightResponse, DashboardResponse, DashboardFullResponse,
            DashboardMemory, UploadMemoryResponse, FeedItem
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Whispers API", description = "Travel memories, feed, likes and AI insights.")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The response payload sent after successfully uploading a memory.
#[derive(Serialize, ToSchema)]
pub struct UploadMemoryResponse {
    message: String,
    ai_insight: String,
}

/// One entry of the public feed.
#[derive(Serialize, ToSchema)]
pub struct FeedItem {
    id: Uuid,
    photo: String,
    photo_url: String,
    location: String,
    feeling: String,
    mood: String,
    vibe: String,
    username: String,
    like_count: i64,
}

impl From<FeedEntry> for FeedItem {
    fn from(entry: FeedEntry) -> Self {
        Self {
            id: entry.id,
            photo_url: photo_url(&entry.photo),
            photo: entry.photo,
            location: entry.location,
            feeling: entry.feeling,
            mood: entry.mood,
            vibe: entry.vibe,
            username: entry.username,
            like_count: entry.like_count,
        }
    }
}

/// Public URL under which a stored photo is served.
pub fn photo_url(photo: &str) -> String {
    format!("/uploads/{}", photo)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

#[derive(Default)]
struct MemoryForm {
    photo: Option<(String, Vec<u8>)>,
    location: Option<String>,
    feeling: Option<String>,
    mood: Option<String>,
    vibe: Option<String>,
}

async fn read_memory_form(mut multipart: Multipart) -> Result<MemoryForm, HandlerError> {
    let mut form = MemoryForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        reject(
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "photo" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(|e| {
                reject(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read file bytes: {}", e),
                )
            })?;
            form.photo = Some((file_name, data.to_vec()));
            continue;
        }
        let text = field.text().await.map_err(|e| {
            reject(
                StatusCode::BAD_REQUEST,
                format!("Failed to read form field `{}`: {}", name, e),
            )
        })?;
        match name.as_str() {
            "location" => form.location = Some(text),
            "feeling" => form.feeling = Some(text),
            "mood" => form.mood = Some(text),
            "vibe" => form.vibe = Some(text),
            _ => {}
        }
    }
    Ok(form)
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Upload a travel memory.
///
/// Accepts multipart/form-data with a `photo` file plus `location`, `feeling`,
/// and optional `mood` (default `happy`) and `vibe` (default `nature`).
#[utoipa::path(
    post,
    path = "/memory",
    request_body(content_type = "multipart/form-data", description = "The photo and memory details."),
    responses(
        (status = 201, description = "Memory uploaded", body = UploadMemoryResponse),
        (status = 400, description = "Missing or invalid photo, location or feeling", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn upload_memory_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let form = read_memory_form(multipart).await?;

    let (file_name, bytes) = match form.photo {
        Some((name, bytes)) if is_allowed_image(&name) => (name, bytes),
        _ => {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                "Photo is required and must be an image file",
            ))
        }
    };

    let request = InsightRequest::new(form.location.as_deref(), form.feeling.as_deref())
        .map_err(|e| match e {
            InsightError::CallerContractViolation(msg) => reject(StatusCode::BAD_REQUEST, msg),
            other => reject(StatusCode::BAD_REQUEST, other.to_string()),
        })?;

    let stored = app_state.uploads.save(&file_name, &bytes).await.map_err(|e| {
        error!("Failed to store photo: {:?}", e);
        reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store photo")
    })?;

    let insight = app_state.insights.generate_insight(&request).await.into_inner();

    let new_memory = NewMemory {
        user_id,
        photo: stored.clone(),
        location: request.location().to_string(),
        feeling: request.feeling().to_string(),
        mood: or_default(form.mood, "happy"),
        vibe: or_default(form.vibe, "nature"),
    };

    match app_state.db.create_memory(new_memory).await {
        Ok(memory) => {
            info!(memory_id = %memory.id, %user_id, "Memory uploaded");
            Ok((
                StatusCode::CREATED,
                Json(UploadMemoryResponse {
                    message: "Memory uploaded successfully!".to_string(),
                    ai_insight: insight.text,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to insert memory: {:?}", e);
            if let Err(io) = tokio::fs::remove_file(app_state.uploads.root().join(&stored)).await {
                warn!("Failed to remove orphaned photo {}: {:?}", stored, io);
            }
            Err(reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to insert memory",
            ))
        }
    }
}

/// List every memory, newest first.
#[utoipa::path(
    get,
    path = "/feed",
    responses(
        (status = 200, description = "All memories, newest first", body = [FeedItem]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn feed_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<FeedItem>>, HandlerError> {
    let entries = app_state.db.list_feed().await.map_err(|e| {
        error!("Failed to load feed: {:?}", e);
        reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load feed")
    })?;
    Ok(Json(entries.into_iter().map(FeedItem::from).collect()))
}

/// Like a memory, or remove the like if it already exists.
#[utoipa::path(
    post,
    path = "/like/{memory_id}",
    params(("memory_id" = Uuid, Path, description = "The memory to like or unlike.")),
    responses(
        (status = 200, description = "Like toggled", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Memory not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn like_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(memory_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, HandlerError> {
    let outcome = app_state
        .db
        .toggle_like(user_id, memory_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => reject(StatusCode::NOT_FOUND, "Memory not found"),
            other => {
                error!("Failed to toggle like: {:?}", other);
                reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to toggle like")
            }
        })?;

    let message = match outcome {
        LikeOutcome::Liked => "Liked successfully",
        LikeOutcome::Unliked => "Unliked successfully",
    };
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}
