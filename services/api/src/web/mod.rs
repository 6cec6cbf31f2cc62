pub mod auth;
pub mod errors;
pub mod insights;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::warn;

pub use auth::{login_handler, signup_handler};
pub use insights::{ai_insight_handler, dashboard_full_handler, dashboard_handler};
pub use middleware::require_auth;
pub use rest::{feed_handler, like_handler, upload_memory_handler};

use state::AppState;

const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Builds the API router with public, protected and static-file routes.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler));

    // Protected routes (bearer token required)
    let protected_routes = Router::new()
        .route("/ai-insight", post(ai_insight_handler))
        .route("/memory", post(upload_memory_handler))
        .route("/feed", get(feed_handler))
        .route("/like/{memory_id}", post(like_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/dashboard-full", get(dashboard_full_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(app_state.uploads.root()))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors_layer(&app_state.config.cors_origin))
        .with_state(app_state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);
    match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin).allow_credentials(true),
        Err(_) => {
            warn!("Ignoring invalid CORS origin '{}'", origin);
            cors
        }
    }
}
