//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::UploadStore;
use crate::config::Config;
use std::sync::Arc;
use whispers_core::{ports::DatabaseService, InsightService};

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub insights: Arc<InsightService>,
    pub uploads: Arc<UploadStore>,
}
