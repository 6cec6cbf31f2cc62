//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup and login, plus the access-token
//! helpers used by the auth middleware.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;
use whispers_core::ports::PortError;

use crate::config::Secret;
use crate::web::errors::{reject, ErrorBody, HandlerError};
use crate::web::state::AppState;

//=========================================================================================
// Access Tokens
//=========================================================================================

/// Claims carried by an access token. `sub` is the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Issues an HS256 access token for the user.
pub fn issue_token(
    secret: &Secret,
    user_id: Uuid,
    username: &str,
    ttl_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose().as_bytes()),
    )
}

/// Verifies signature and expiry, returning the user id from `sub`.
pub fn verify_token(secret: &Secret, token: &str) -> Option<Uuid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.expose().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .ok()?;
    Uuid::parse_str(&data.claims.sub).ok()
}

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub username: String,
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /signup - Create a new user account
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = MessageResponse),
        (status = 400, description = "Missing fields or duplicate username/email", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let (Some(username), Some(email), Some(password)) = (
        required(&req.username),
        required(&req.email),
        required(&req.password),
    ) else {
        return Err(reject(StatusCode::BAD_REQUEST, "All fields are required"));
    };

    // 1. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
        })?
        .to_string();

    // 2. Create user in database
    let user = state
        .db
        .create_user(username.trim(), email.trim(), &password_hash)
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => {
                reject(StatusCode::BAD_REQUEST, "Username or email already exists")
            }
            other => {
                error!("Failed to create user: {:?}", other);
                reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user")
            }
        })?;

    info!(user_id = %user.id, "User signed up");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully!".to_string(),
        }),
    ))
}

/// POST /login - Exchange email and password for an access token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let (Some(email), Some(password)) = (required(&req.email), required(&req.password)) else {
        return Err(reject(StatusCode::BAD_REQUEST, "Email and password are required"));
    };

    // 1. Get user by email
    let user_creds = state
        .db
        .get_user_by_email(email.trim())
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => {
                reject(StatusCode::UNAUTHORIZED, "Invalid email or password")
            }
            other => {
                error!("Failed to get user: {:?}", other);
                reject(StatusCode::INTERNAL_SERVER_ERROR, "Authentication error")
            }
        })?;

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&user_creds.password_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        reject(StatusCode::INTERNAL_SERVER_ERROR, "Authentication error")
    })?;

    let valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err(reject(StatusCode::UNAUTHORIZED, "Invalid email or password"));
    }

    // 3. Issue the access token
    let access_token = issue_token(
        &state.config.jwt_secret,
        user_creds.id,
        &user_creds.username,
        state.config.jwt_ttl_hours,
    )
    .map_err(|e| {
        error!("Failed to issue access token: {:?}", e);
        reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create token")
    })?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        access_token,
        username: user_creds.username,
    }))
}
