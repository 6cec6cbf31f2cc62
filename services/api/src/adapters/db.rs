//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use whispers_core::domain::{FeedEntry, LikeOutcome, Memory, NewMemory, User, UserCredentials};
use whispers_core::ports::{DatabaseService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
        }
    }

    fn to_credentials(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct MemoryRow {
    id: Uuid,
    user_id: Uuid,
    photo: String,
    location: String,
    feeling: String,
    mood: String,
    vibe: String,
    created_at: DateTime<Utc>,
}
impl MemoryRow {
    fn to_domain(self) -> Memory {
        Memory {
            id: self.id,
            user_id: self.user_id,
            photo: self.photo,
            location: self.location,
            feeling: self.feeling,
            mood: self.mood,
            vibe: self.vibe,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct FeedRow {
    id: Uuid,
    photo: String,
    location: String,
    feeling: String,
    mood: String,
    vibe: String,
    username: String,
    like_count: i64,
}
impl FeedRow {
    fn to_domain(self) -> FeedEntry {
        FeedEntry {
            id: self.id,
            photo: self.photo,
            location: self.location,
            feeling: self.feeling,
            mood: self.mood,
            vibe: self.vibe,
            username: self.username,
            like_count: self.like_count,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, username, email, password_hash) VALUES ($1, $2, $3, $4) \
             RETURNING id, username, email, password_hash",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::Conflict("Username or email already exists".to_string())
            }
            other => unexpected(other),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            other => unexpected(other),
        })?;
        Ok(record.to_credentials())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, password_hash FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
            other => unexpected(other),
        })?;
        Ok(record.to_domain())
    }

    async fn create_memory(&self, memory: NewMemory) -> PortResult<Memory> {
        let record = sqlx::query_as::<_, MemoryRow>(
            "INSERT INTO memories (id, user_id, photo, location, feeling, mood, vibe) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, user_id, photo, location, feeling, mood, vibe, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(memory.user_id)
        .bind(&memory.photo)
        .bind(&memory.location)
        .bind(&memory.feeling)
        .bind(&memory.mood)
        .bind(&memory.vibe)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_feed(&self) -> PortResult<Vec<FeedEntry>> {
        let records = sqlx::query_as::<_, FeedRow>(
            "SELECT m.id, m.photo, m.location, m.feeling, m.mood, m.vibe, u.username, \
                    (SELECT COUNT(*) FROM likes l WHERE l.memory_id = m.id) AS like_count \
             FROM memories m \
             JOIN users u ON m.user_id = u.id \
             ORDER BY m.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_memories_for_user(&self, user_id: Uuid) -> PortResult<Vec<Memory>> {
        let records = sqlx::query_as::<_, MemoryRow>(
            "SELECT id, user_id, photo, location, feeling, mood, vibe, created_at \
             FROM memories WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn toggle_like(&self, user_id: Uuid, memory_id: Uuid) -> PortResult<LikeOutcome> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM memories WHERE id = $1")
            .bind(memory_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unexpected)?;
        if exists.is_none() {
            return Err(PortError::NotFound(format!("Memory {} not found", memory_id)));
        }

        let removed = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND memory_id = $2")
            .bind(user_id)
            .bind(memory_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?
            .rows_affected();

        let outcome = if removed > 0 {
            LikeOutcome::Unliked
        } else {
            sqlx::query(
                "INSERT INTO likes (id, user_id, memory_id) VALUES ($1, $2, $3) \
                 ON CONFLICT (user_id, memory_id) DO NOTHING",
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(memory_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
            LikeOutcome::Liked
        };

        tx.commit().await.map_err(unexpected)?;
        Ok(outcome)
    }

    async fn count_likes_for_user(&self, user_id: Uuid) -> PortResult<i64> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM likes l JOIN memories m ON l.memory_id = m.id WHERE m.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(total)
    }
}
