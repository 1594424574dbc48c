//! Unauthenticated public page endpoints.
//!
//! Entitlement is computed fresh on every render: a lapsed grant downgrades
//! premium appearance selections and truncates the link list at read time
//! without touching the stored rows.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use linkfolio_core::entitlement::public_links;
use linkfolio_core::models::Appearance;
use linkfolio_core::validation::normalize_username;
use linkfolio_core::{effective_tier, is_entitled, AppError, PlanTier};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicLinkResponse {
    pub id: Uuid,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PublicProfileResponse {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    /// Premium selections already downgraded if entitlement lapsed
    pub appearance: Appearance,
    pub links: Vec<PublicLinkResponse>,
    /// True only for a currently-entitled DIAMOND account
    pub show_badge: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/p/{username}",
    tag = "public",
    params(("username" = String, Path, description = "Public page slug")),
    responses(
        (status = 200, description = "Public profile page data", body = PublicProfileResponse),
        (status = 404, description = "No such profile", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(username = %username))]
pub async fn get_public_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let username = normalize_username(&username);
    let user = state
        .db
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let now = Utc::now();
    let plan = user.plan_state();
    let entitled = is_entitled(&plan, PlanTier::Pro, now);

    let links = state.db.links.list_active(user.id).await?;
    let links = public_links(links, entitled)
        .into_iter()
        .map(|link| PublicLinkResponse {
            id: link.id,
            title: link.title,
            url: link.url,
        })
        .collect();

    // Best-effort; a failed insert never fails the page.
    if let Err(e) = state.db.analytics.record_page_view(user.id).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to record page view");
    }

    Ok(Json(PublicProfileResponse {
        username: user.username.clone(),
        display_name: user.display_name.clone(),
        bio: user.bio.clone(),
        avatar_url: user.avatar_url.clone(),
        appearance: user.appearance().for_public_page(entitled),
        links,
        show_badge: effective_tier(&plan, now) == PlanTier::Diamond,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/p/links/{id}/click",
    tag = "public",
    params(("id" = Uuid, Path, description = "Link id")),
    responses(
        (status = 204, description = "Click recorded"),
        (status = 404, description = "Link missing, deleted or hidden", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all, fields(link_id = %id))]
pub async fn record_link_click(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    let recorded = state.db.analytics.record_link_click(id).await?;
    if !recorded {
        return Err(HttpAppError(AppError::NotFound(
            "Link not found".to_string(),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
