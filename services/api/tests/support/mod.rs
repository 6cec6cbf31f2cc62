#![allow(dead_code)]

use api_lib::adapters::UploadStore;
use api_lib::config::{Config, GenerationConfig, Secret};
use api_lib::web::state::AppState;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;
use uuid::Uuid;
use whispers_core::domain::{FeedEntry, LikeOutcome, Memory, NewMemory, User, UserCredentials};
use whispers_core::error::{CoreResult, InsightError};
use whispers_core::ports::{DatabaseService, PortError, PortResult, TextGenerationService};
use whispers_core::InsightService;

pub const JWT_SECRET: &str = "test-secret";

pub fn generation_config(endpoint: String, timeout: StdDuration) -> GenerationConfig {
    GenerationConfig {
        endpoint,
        model: "test-model".to_string(),
        api_key: Some(Secret::new("hf_test_key")),
        timeout,
    }
}

pub fn test_config(upload_dir: &Path) -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: String::new(),
        log_level: tracing::Level::INFO,
        upload_dir: upload_dir.to_path_buf(),
        jwt_secret: Secret::new(JWT_SECRET),
        jwt_ttl_hours: 1,
        cors_origin: "http://localhost:3000".to_string(),
        generation: generation_config("http://127.0.0.1:9/unused".to_string(), StdDuration::from_secs(1)),
    }
}

pub fn app_state(
    db: Arc<InMemoryDb>,
    generator: Arc<dyn TextGenerationService>,
    upload_dir: &Path,
) -> Arc<AppState> {
    Arc::new(AppState {
        db,
        config: Arc::new(test_config(upload_dir)),
        insights: Arc::new(InsightService::new(generator)),
        uploads: Arc::new(UploadStore::new(upload_dir)),
    })
}

//=========================================================================================
// Scripted Generator
//=========================================================================================

/// Returns the same reply for every prompt.
pub struct FixedGenerator(pub CoreResult<String>);

impl FixedGenerator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self(Ok(text.to_string())))
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self(Err(InsightError::GenerationFailed(
            "upstream returned status 500".to_string(),
        ))))
    }
}

#[async_trait]
impl TextGenerationService for FixedGenerator {
    async fn complete(&self, _prompt: &str) -> CoreResult<String> {
        self.0.clone()
    }
}

//=========================================================================================
// In-Memory Database
//=========================================================================================

#[derive(Default)]
struct Tables {
    users: Vec<UserCredentials>,
    memories: Vec<Memory>,
    likes: Vec<(Uuid, Uuid)>,
}

#[derive(Default)]
pub struct InMemoryDb {
    tables: Mutex<Tables>,
}

impl InMemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Inserts a user with an unusable password hash.
    pub fn seed_user(&self, username: &str) -> User {
        let creds = UserCredentials {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "not-a-hash".to_string(),
        };
        let user = User {
            id: creds.id,
            username: creds.username.clone(),
            email: creds.email.clone(),
        };
        self.tables.lock().unwrap().users.push(creds);
        user
    }

    /// Inserts a memory created `age_minutes` ago.
    pub fn seed_memory(&self, user_id: Uuid, location: &str, age_minutes: i64) -> Memory {
        let memory = Memory {
            id: Uuid::new_v4(),
            user_id,
            photo: format!("{}.png", location.to_lowercase()),
            location: location.to_string(),
            feeling: "peaceful".to_string(),
            mood: "calm".to_string(),
            vibe: "nature".to_string(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
        };
        self.tables.lock().unwrap().memories.push(memory.clone());
        memory
    }

    pub fn memories(&self) -> Vec<Memory> {
        self.tables.lock().unwrap().memories.clone()
    }
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .users
            .iter()
            .any(|u| u.username == username || u.email == email)
        {
            return Err(PortError::Conflict("Username or email already exists".to_string()));
        }
        let creds = UserCredentials {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        let user = User {
            id: creds.id,
            username: creds.username.clone(),
            email: creds.email.clone(),
        };
        tables.users.push(creds);
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        self.tables
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| User {
                id: u.id,
                username: u.username.clone(),
                email: u.email.clone(),
            })
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn create_memory(&self, memory: NewMemory) -> PortResult<Memory> {
        let stored = Memory {
            id: Uuid::new_v4(),
            user_id: memory.user_id,
            photo: memory.photo,
            location: memory.location,
            feeling: memory.feeling,
            mood: memory.mood,
            vibe: memory.vibe,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().memories.push(stored.clone());
        Ok(stored)
    }

    async fn list_feed(&self) -> PortResult<Vec<FeedEntry>> {
        let tables = self.tables.lock().unwrap();
        let mut memories = tables.memories.clone();
        memories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(memories
            .into_iter()
            .map(|m| FeedEntry {
                username: tables
                    .users
                    .iter()
                    .find(|u| u.id == m.user_id)
                    .map(|u| u.username.clone())
                    .unwrap_or_default(),
                like_count: tables.likes.iter().filter(|(_, mid)| *mid == m.id).count() as i64,
                id: m.id,
                photo: m.photo,
                location: m.location,
                feeling: m.feeling,
                mood: m.mood,
                vibe: m.vibe,
            })
            .collect())
    }

    async fn list_memories_for_user(&self, user_id: Uuid) -> PortResult<Vec<Memory>> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .memories
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn toggle_like(&self, user_id: Uuid, memory_id: Uuid) -> PortResult<LikeOutcome> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.memories.iter().any(|m| m.id == memory_id) {
            return Err(PortError::NotFound(format!("Memory {} not found", memory_id)));
        }
        if let Some(pos) = tables
            .likes
            .iter()
            .position(|like| *like == (user_id, memory_id))
        {
            tables.likes.remove(pos);
            Ok(LikeOutcome::Unliked)
        } else {
            tables.likes.push((user_id, memory_id));
            Ok(LikeOutcome::Liked)
        }
    }

    async fn count_likes_for_user(&self, user_id: Uuid) -> PortResult<i64> {
        let tables = self.tables.lock().unwrap();
        let count = tables
            .likes
            .iter()
            .filter(|(_, memory_id)| {
                tables
                    .memories
                    .iter()
                    .any(|m| m.id == *memory_id && m.user_id == user_id)
            })
            .count();
        Ok(count as i64)
    }
}
