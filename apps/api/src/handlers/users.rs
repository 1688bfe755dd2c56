//! User registration and token endpoints.
//!
//! `POST /register` creates a non-staff account (staff accounts are
//! provisioned out of band). `POST /login` verifies the password and
//! issues an access/refresh pair; `POST /refresh` rotates it.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use nova_core::{validation, CoreError, User};

use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// View Models
// =============================================================================

/// Public account view (never carries the password hash).
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_staff: user.is_staff,
        }
    }
}

/// Access/refresh token pair.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Body for `POST /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// `POST /register` - create a new (non-staff) account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    validation::validate_email(&body.email).map_err(CoreError::from)?;
    validation::validate_password(&body.password).map_err(CoreError::from)?;

    let password_hash = hash_password(&body.password)?;

    let user = state
        .db
        .users()
        .insert(
            &body.email,
            &password_hash,
            &body.first_name,
            &body.last_name,
            false,
        )
        .await?;

    info!(user_id = %user.id, "Account registered");

    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

/// `POST /login` - verify credentials and issue a token pair.
///
/// A missing account and a wrong password answer identically.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let user = state.db.users().get_by_email(body.email.trim()).await?;

    let user = match user {
        Some(user) if verify_password(&body.password, &user.password_hash) => user,
        _ => {
            warn!(email = %body.email, "Failed login attempt");
            return Err(ApiError::unauthorized("Invalid email or password"));
        }
    };

    let access = state
        .jwt
        .generate_access_token(&user.id, &user.email, user.is_staff)?;
    let refresh = state
        .jwt
        .generate_refresh_token(&user.id, &user.email, user.is_staff)?;

    info!(user_id = %user.id, "Login");

    Ok(Json(TokenPair { access, refresh }))
}

/// `POST /refresh` - exchange a refresh token for a new pair.
///
/// Claims are re-read from the database so a role change (or a deleted
/// account) takes effect at the next refresh.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let claims = state.jwt.validate_refresh_token(&body.refresh)?;

    let user = state
        .db
        .users()
        .get_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    let access = state
        .jwt
        .generate_access_token(&user.id, &user.email, user.is_staff)?;
    let refresh = state
        .jwt
        .generate_refresh_token(&user.id, &user.email, user.is_staff)?;

    Ok(Json(TokenPair { access, refresh }))
}
