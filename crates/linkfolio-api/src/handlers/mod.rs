//! HTTP handlers.

pub mod admin_users;
pub mod auth;
pub mod billing;
pub mod catalogs;
pub mod links;
pub mod me;
pub mod public_profile;

use linkfolio_core::models::User;
use linkfolio_core::AppError;
use uuid::Uuid;

use crate::state::AppState;

/// Loads the authenticated user's row. A missing row means the account was
/// deleted after the token was issued.
pub(crate) async fn load_user(state: &AppState, user_id: Uuid) -> Result<User, AppError> {
    state
        .db
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Best-effort cache purge after a mutation that changes the public page.
pub(crate) async fn invalidate_profile_cache(state: &AppState, user_id: Uuid, username: &str) {
    if let Err(e) = state.invalidator.invalidate_profile(user_id, username).await {
        tracing::warn!(user_id = %user_id, error = %e, "Profile cache invalidation failed");
    }
}
