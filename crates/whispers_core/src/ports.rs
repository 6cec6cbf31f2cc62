//! crates/whispers_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{FeedEntry, LikeOutcome, Memory, NewMemory, User, UserCredentials};
use crate::error::CoreResult;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for persistence port operations.
/// This abstracts away the specific errors from external services (e.g., the database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    /// Fails with `PortError::Conflict` when the username or email is taken.
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    // --- Memories ---
    async fn create_memory(&self, memory: NewMemory) -> PortResult<Memory>;

    /// All memories from every user, newest first.
    async fn list_feed(&self) -> PortResult<Vec<FeedEntry>>;

    async fn list_memories_for_user(&self, user_id: Uuid) -> PortResult<Vec<Memory>>;

    // --- Likes ---
    /// Likes the memory, or removes an existing like. Fails with
    /// `PortError::NotFound` for an unknown memory.
    async fn toggle_like(&self, user_id: Uuid, memory_id: Uuid) -> PortResult<LikeOutcome>;

    /// Number of likes received across all of the user's memories.
    async fn count_likes_for_user(&self, user_id: Uuid) -> PortResult<i64>;
}

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Sends one prompt to the generative upstream and returns the raw reply.
    ///
    /// Exactly one attempt is made. Every failure is reported as
    /// `InsightError::GenerationFailed`.
    async fn complete(&self, prompt: &str) -> CoreResult<String>;
}
