//! Admin user management.
//!
//! Plan grants and removals route through the entitlement service, which
//! also performs the admin authorization check. The listing endpoint gates
//! here because it is a plain read.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use linkfolio_core::{AppError, GrantDuration, PlanTier};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::me::UserResponse;
use crate::state::AppState;

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersQuery {
    /// Page size (1 to 100)
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "admin",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Paginated user listing with derived plan fields", body = UserListResponse),
        (status = 401, description = "Not an administrator", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = %ctx.user_id))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !ctx.is_admin {
        return Err(HttpAppError(AppError::Unauthorized(
            "Administrator privileges required".to_string(),
        )));
    }

    let limit = query.limit.clamp(1, 100);
    let offset = query.offset.max(0);
    let users = state.db.users.list_users(limit, offset).await?;
    let total = state.db.users.count_users().await?;

    let now = Utc::now();
    Ok(Json(UserListResponse {
        users: users
            .iter()
            .map(|user| UserResponse::from_user(user, now))
            .collect(),
        total,
        limit,
        offset,
    }))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GrantPlanRequest {
    pub tier: PlanTier,
    /// `{"days": n}`, `{"months": n}`, `{"years": n}` or `"lifetime"`
    pub duration: GrantDuration,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/plan",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Target user id")),
    request_body = GrantPlanRequest,
    responses(
        (status = 200, description = "User with the new plan applied", body = UserResponse),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = %ctx.user_id, user_id = %id))]
pub async fn grant_plan(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<GrantPlanRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let now = Utc::now();
    let updated = state
        .entitlements
        .grant_plan(&ctx, id, payload.tier, payload.duration, now)
        .await?;
    Ok(Json(UserResponse::from_user(&updated, now)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{id}/plan",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Target user id")),
    responses(
        (status = 200, description = "User reset to FREE", body = UserResponse),
        (status = 401, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(actor_id = %ctx.user_id, user_id = %id))]
pub async fn remove_plan(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let now = Utc::now();
    let updated = state.entitlements.remove_plan(&ctx, id, now).await?;
    Ok(Json(UserResponse::from_user(&updated, now)))
}
