//! Link CRUD for the authenticated user.
//!
//! The FREE cap is enforced at creation time inside the repository
//! transaction; the limit itself comes from the entitlement engine so an
//! active PRO or DIAMOND grant lifts it.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use linkfolio_core::models::Link;
use linkfolio_core::validation::validate_link_url;
use linkfolio_core::{AppError, LinkLimits};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{invalidate_profile_cache, load_user};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkResponse {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub position: i32,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
            position: link.position,
            is_visible: link.is_visible,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 80, message = "title must be 1 to 80 characters"))]
    pub title: String,
    #[validate(custom(function = validate_link_url, message = "url must be a valid http(s) URL"))]
    pub url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 80, message = "title must be 1 to 80 characters"))]
    pub title: Option<String>,
    #[validate(custom(function = validate_link_url, message = "url must be a valid http(s) URL"))]
    pub url: Option<String>,
    pub is_visible: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReorderRequest {
    /// Every active link id exactly once, in the desired order
    pub link_ids: Vec<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/v1/links",
    tag = "links",
    responses(
        (status = 200, description = "Active links in display order", body = [LinkResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn list_links(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let links = state.db.links.list_active(ctx.user_id).await?;
    Ok(Json(
        links.into_iter().map(LinkResponse::from).collect::<Vec<_>>(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/links",
    tag = "links",
    request_body = CreateLinkRequest,
    responses(
        (status = 201, description = "Link created", body = LinkResponse),
        (status = 400, description = "Invalid title or URL", body = ErrorResponse),
        (status = 422, description = "FREE link cap reached", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(payload): ValidatedJson<CreateLinkRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = load_user(&state, ctx.user_id).await?;

    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "title cannot be blank".to_string(),
        )));
    }

    let max_active = LinkLimits::max_active_links(&user.plan_state(), Utc::now());
    let link = state
        .db
        .links
        .create_capped(ctx.user_id, &title, &payload.url, max_active)
        .await?;

    invalidate_profile_cache(&state, user.id, &user.username).await;
    Ok((StatusCode::CREATED, Json(LinkResponse::from(link))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/links/{id}",
    tag = "links",
    params(("id" = Uuid, Path, description = "Link id")),
    request_body = UpdateLinkRequest,
    responses(
        (status = 200, description = "Updated link", body = LinkResponse),
        (status = 404, description = "No such active link for this user", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, link_id = %id))]
pub async fn update_link(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateLinkRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = load_user(&state, ctx.user_id).await?;

    let title = payload
        .title
        .as_deref()
        .map(|t| {
            let t = t.trim();
            if t.is_empty() {
                Err(AppError::InvalidInput("title cannot be blank".to_string()))
            } else {
                Ok(t.to_string())
            }
        })
        .transpose()?;

    let updated = state
        .db
        .links
        .update_link(
            ctx.user_id,
            id,
            title.as_deref(),
            payload.url.as_deref(),
            payload.is_visible,
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Link not found".to_string()))?;

    invalidate_profile_cache(&state, user.id, &user.username).await;
    Ok(Json(LinkResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/links/{id}",
    tag = "links",
    params(("id" = Uuid, Path, description = "Link id")),
    responses(
        (status = 204, description = "Link soft-deleted"),
        (status = 404, description = "No such active link for this user", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id, link_id = %id))]
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    let user = load_user(&state, ctx.user_id).await?;

    let deleted = state.db.links.soft_delete(ctx.user_id, id).await?;
    if !deleted {
        return Err(HttpAppError(AppError::NotFound(
            "Link not found".to_string(),
        )));
    }

    invalidate_profile_cache(&state, user.id, &user.username).await;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v1/links/reorder",
    tag = "links",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Links in the new order", body = [LinkResponse]),
        (status = 400, description = "Ids do not match the active link set", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn reorder_links(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(payload): ValidatedJson<ReorderRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = load_user(&state, ctx.user_id).await?;

    let links = state
        .db
        .links
        .reorder(ctx.user_id, &payload.link_ids)
        .await?;

    invalidate_profile_cache(&state, user.id, &user.username).await;
    Ok(Json(
        links.into_iter().map(LinkResponse::from).collect::<Vec<_>>(),
    ))
}
