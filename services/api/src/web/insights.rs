//! services/api/src/web/insights.rs
//!
//! Handlers for the AI-backed endpoints. These never fail because of the
//! generative upstream: the core substitutes fallback content instead.

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;
use whispers_core::{
    domain::{Memory, MemoryRecord, MoodDistribution, PersonalitySummary, RecommendationSet, User},
    error::InsightError,
    ports::PortError,
    InsightRequest,
};

use crate::web::errors::{reject, ErrorBody, HandlerError};
use crate::web::rest::photo_url;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct InsightBody {
    pub location: Option<String>,
    pub feeling: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct InsightResponse {
    pub insight: String,
}

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub username: String,
    #[schema(value_type = Vec<Object>)]
    pub recommendations: RecommendationSet,
}

/// One of the caller's own memories as shown on the full dashboard.
#[derive(Serialize, ToSchema)]
pub struct DashboardMemory {
    pub location: String,
    pub feeling: String,
    pub mood: String,
    pub vibe: String,
    pub date: DateTime<Utc>,
    pub image_url: String,
}

impl From<&Memory> for DashboardMemory {
    fn from(memory: &Memory) -> Self {
        Self {
            location: memory.location.clone(),
            feeling: memory.feeling.clone(),
            mood: memory.mood.clone(),
            vibe: memory.vibe.clone(),
            date: memory.created_at,
            image_url: photo_url(&memory.photo),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DashboardFullResponse {
    pub username: String,
    pub total_memories: usize,
    pub total_likes: i64,
    pub memories: Vec<DashboardMemory>,
    #[schema(value_type = Object)]
    pub personality: PersonalitySummary,
    #[serde(rename = "topMoods")]
    #[schema(value_type = Vec<Object>)]
    pub top_moods: MoodDistribution,
}

//=========================================================================================
// Shared Lookups
//=========================================================================================

async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, HandlerError> {
    state.db.get_user_by_id(user_id).await.map_err(|e| match e {
        PortError::NotFound(_) => reject(StatusCode::NOT_FOUND, "User not found"),
        other => {
            error!("Failed to load user {}: {:?}", user_id, other);
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load user")
        }
    })
}

async fn load_memories(state: &AppState, user_id: Uuid) -> Result<Vec<Memory>, HandlerError> {
    state.db.list_memories_for_user(user_id).await.map_err(|e| {
        error!("Failed to load memories for {}: {:?}", user_id, e);
        reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load memories")
    })
}

//=========================================================================================
// Handlers
//=========================================================================================

/// Generate a short reflective insight for one location and feeling.
#[utoipa::path(
    post,
    path = "/ai-insight",
    request_body = InsightBody,
    responses(
        (status = 200, description = "Generated or fallback insight", body = InsightResponse),
        (status = 400, description = "Location or feeling missing", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn ai_insight_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<InsightBody>,
) -> Result<Json<InsightResponse>, HandlerError> {
    let request = InsightRequest::new(body.location.as_deref(), body.feeling.as_deref())
        .map_err(|e| match e {
            InsightError::CallerContractViolation(msg) => reject(StatusCode::BAD_REQUEST, msg),
            other => reject(StatusCode::BAD_REQUEST, other.to_string()),
        })?;

    let insight = state.insights.generate_insight(&request).await.into_inner();
    Ok(Json(InsightResponse {
        insight: insight.text,
    }))
}

/// Three destination recommendations derived from the caller's memories.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Generated or fallback recommendations", body = DashboardResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<DashboardResponse>, HandlerError> {
    let user = load_user(&state, user_id).await?;
    let records: Vec<MemoryRecord> = load_memories(&state, user_id)
        .await?
        .iter()
        .map(Memory::to_record)
        .collect();

    let recommendations = state
        .insights
        .generate_recommendations(&records)
        .await
        .into_inner();

    Ok(Json(DashboardResponse {
        username: user.username,
        recommendations,
    }))
}

/// The caller's memories, totals, travel personality and top moods.
#[utoipa::path(
    get,
    path = "/dashboard-full",
    responses(
        (status = 200, description = "Full dashboard", body = DashboardFullResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
pub async fn dashboard_full_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<DashboardFullResponse>, HandlerError> {
    let user = load_user(&state, user_id).await?;
    let memories = load_memories(&state, user_id).await?;
    let total_likes = state.db.count_likes_for_user(user_id).await.map_err(|e| {
        error!("Failed to count likes for {}: {:?}", user_id, e);
        reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to count likes")
    })?;

    let records: Vec<MemoryRecord> = memories.iter().map(Memory::to_record).collect();
    let summary = state
        .insights
        .generate_dashboard_summary(&records)
        .await
        .into_inner();

    Ok(Json(DashboardFullResponse {
        username: user.username,
        total_memories: memories.len(),
        total_likes,
        memories: memories.iter().map(DashboardMemory::from).collect(),
        personality: summary.personality,
        top_moods: summary.top_moods,
    }))
}
