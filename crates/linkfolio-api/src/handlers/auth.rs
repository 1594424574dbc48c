//! Registration and login.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use linkfolio_core::validation::{normalize_username, validate_username};
use linkfolio_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{jwt, password};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::me::UserResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Public page slug: lowercase letters, digits, underscore
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8 to 128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid username, email or password", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(username = %payload.username))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let username = normalize_username(&payload.username);
    validate_username(&username).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let email = payload.email.trim().to_lowercase();
    let password_hash = password::hash_password(&payload.password)?;

    let user = state
        .db
        .users
        .create_user(&username, &email, &password_hash)
        .await?;

    let token = jwt::issue_token(
        user.id,
        user.is_admin,
        state.config.jwt_secret(),
        state.config.jwt_expiry_hours(),
    )?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserResponse::from_user(&user, Utc::now()),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let email = payload.email.trim().to_lowercase();

    // The failure shape is identical whether the account is missing or the
    // password is wrong.
    let user = match state.db.users.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            return Err(HttpAppError(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            )));
        }
    };
    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(HttpAppError(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        )));
    }

    let token = jwt::issue_token(
        user.id,
        user.is_admin,
        state.config.jwt_secret(),
        state.config.jwt_expiry_hours(),
    )?;

    tracing::debug!(user_id = %user.id, "User logged in");
    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from_user(&user, Utc::now()),
    }))
}
