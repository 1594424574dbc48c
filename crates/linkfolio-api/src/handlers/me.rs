//! Authenticated account endpoints: profile, appearance, plan status, stats.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Days, Utc};
use linkfolio_core::models::appearance::{BACKGROUNDS, LAYOUTS, THEMES};
use linkfolio_core::models::{DailyCount, LinkClickStats, StatsTotals, User};
use linkfolio_core::validation::{
    validate_link_url, MAX_BIO_LENGTH, MAX_DISPLAY_NAME_LENGTH,
};
use linkfolio_core::{
    effective_tier, entitlement::check_appearance_selection, is_entitled, remaining_days,
    AppError, LinkLimits, PlanTier,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthContext;
use crate::constants::{DEFAULT_STATS_WINDOW_DAYS, MAX_STATS_WINDOW_DAYS};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{invalidate_profile_cache, load_user};
use crate::state::AppState;

/// API view of a user account: the stored columns plus the derived plan
/// fields clients need to render gating state.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    /// Stored tier; may have lapsed
    pub plan_type: PlanTier,
    /// Tier currently in effect, derived at read time
    pub effective_plan: PlanTier,
    pub pro_expires_at: Option<DateTime<Utc>>,
    pub remaining_days: Option<i64>,
    pub theme: String,
    pub background: String,
    pub layout: String,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_user(user: &User, now: DateTime<Utc>) -> Self {
        let plan = user.plan_state();
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            bio: user.bio.clone(),
            avatar_url: user.avatar_url.clone(),
            is_admin: user.is_admin,
            plan_type: user.plan_type,
            effective_plan: effective_tier(&plan, now),
            pro_expires_at: user.pro_expires_at,
            remaining_days: remaining_days(&plan, now),
            theme: user.theme.clone(),
            background: user.background.clone(),
            layout: user.layout.clone(),
            created_at: user.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "me",
    responses(
        (status = 200, description = "The authenticated account", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = load_user(&state, ctx.user_id).await?;
    Ok(Json(UserResponse::from_user(&user, Utc::now())))
}

/// Distinguishes "field absent" (keep) from "field: null" (clear).
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    /// Omit to keep the current value, send null to clear it
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub avatar_url: Option<Option<String>>,
}

/// Applies one patch field over the current value. A trimmed-empty string
/// clears the field the same way an explicit null does.
fn merge_text(
    current: Option<String>,
    patch: Option<Option<String>>,
    max_chars: usize,
    field: &str,
) -> Result<Option<String>, AppError> {
    match patch {
        None => Ok(current),
        Some(None) => Ok(None),
        Some(Some(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.chars().count() > max_chars {
                return Err(AppError::InvalidInput(format!(
                    "{} cannot exceed {} characters",
                    field, max_chars
                )));
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn merge_avatar_url(
    current: Option<String>,
    patch: Option<Option<String>>,
) -> Result<Option<String>, AppError> {
    match patch {
        None => Ok(current),
        Some(None) => Ok(None),
        Some(Some(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            validate_link_url(trimmed).map_err(|_| {
                AppError::InvalidInput("avatar_url must be a valid http(s) URL".to_string())
            })?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/me/profile",
    tag = "me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Invalid field value", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = load_user(&state, ctx.user_id).await?;

    let display_name = merge_text(
        user.display_name.clone(),
        payload.display_name,
        MAX_DISPLAY_NAME_LENGTH,
        "display_name",
    )?;
    let bio = merge_text(user.bio.clone(), payload.bio, MAX_BIO_LENGTH, "bio")?;
    let avatar_url = merge_avatar_url(user.avatar_url.clone(), payload.avatar_url)?;

    let updated = state
        .db
        .users
        .update_profile(
            ctx.user_id,
            display_name.as_deref(),
            bio.as_deref(),
            avatar_url.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    invalidate_profile_cache(&state, updated.id, &updated.username).await;
    Ok(Json(UserResponse::from_user(&updated, Utc::now())))
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAppearanceRequest {
    pub theme: Option<String>,
    pub background: Option<String>,
    pub layout: Option<String>,
}

#[utoipa::path(
    patch,
    path = "/api/v1/me/appearance",
    tag = "me",
    request_body = UpdateAppearanceRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Unknown catalog identifier", body = ErrorResponse),
        (status = 402, description = "Premium entry without entitlement", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn update_appearance(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    ValidatedJson(payload): ValidatedJson<UpdateAppearanceRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = load_user(&state, ctx.user_id).await?;
    let plan = user.plan_state();
    let now = Utc::now();

    if let Some(theme) = payload.theme.as_deref() {
        check_appearance_selection(THEMES, theme, &plan, now)?;
    }
    if let Some(background) = payload.background.as_deref() {
        check_appearance_selection(BACKGROUNDS, background, &plan, now)?;
    }
    if let Some(layout) = payload.layout.as_deref() {
        check_appearance_selection(LAYOUTS, layout, &plan, now)?;
    }

    let theme = payload.theme.unwrap_or_else(|| user.theme.clone());
    let background = payload.background.unwrap_or_else(|| user.background.clone());
    let layout = payload.layout.unwrap_or_else(|| user.layout.clone());

    let updated = state
        .db
        .users
        .update_appearance(ctx.user_id, &theme, &background, &layout)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    invalidate_profile_cache(&state, updated.id, &updated.username).await;
    Ok(Json(UserResponse::from_user(&updated, now)))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanStatusResponse {
    /// Stored tier; may have lapsed
    pub plan_type: PlanTier,
    /// Tier currently in effect, derived at read time
    pub effective_plan: PlanTier,
    pub pro_expires_at: Option<DateTime<Utc>>,
    /// True for a paid tier with no expiration
    pub lifetime: bool,
    pub remaining_days: Option<i64>,
    /// None means unlimited
    pub max_active_links: Option<i64>,
    pub active_links: i64,
}

#[utoipa::path(
    get,
    path = "/api/v1/me/plan",
    tag = "me",
    responses(
        (status = 200, description = "Current plan status", body = PlanStatusResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn get_my_plan(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = load_user(&state, ctx.user_id).await?;
    let active_links = state.db.links.count_active(ctx.user_id).await?;

    let plan = user.plan_state();
    let now = Utc::now();
    Ok(Json(PlanStatusResponse {
        plan_type: plan.plan_type,
        effective_plan: effective_tier(&plan, now),
        pro_expires_at: plan.pro_expires_at,
        lifetime: plan.is_lifetime(),
        remaining_days: remaining_days(&plan, now),
        max_active_links: LinkLimits::max_active_links(&plan, now),
        active_links,
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatsQuery {
    /// Series window in days (default 30, max 90)
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub totals: StatsTotals,
    /// Window actually used for the series; absent for FREE accounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<Vec<DailyCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkClickStats>>,
}

#[utoipa::path(
    get,
    path = "/api/v1/me/stats",
    tag = "me",
    params(StatsQuery),
    responses(
        (status = 200, description = "Aggregated stats; series and breakdown require PRO", body = StatsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %ctx.user_id))]
pub async fn get_my_stats(
    State(state): State<Arc<AppState>>,
    ctx: AuthContext,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = load_user(&state, ctx.user_id).await?;
    let totals = state.db.analytics.totals(ctx.user_id).await?;

    // Recording is unconditional; the detailed view is the gated part.
    if !is_entitled(&user.plan_state(), PlanTier::Pro, Utc::now()) {
        return Ok(Json(StatsResponse {
            totals,
            window_days: None,
            daily: None,
            links: None,
        }));
    }

    let days = query
        .days
        .unwrap_or(DEFAULT_STATS_WINDOW_DAYS)
        .clamp(1, MAX_STATS_WINDOW_DAYS);
    let end_day = Utc::now().date_naive();
    let start_day = end_day
        .checked_sub_days(Days::new((days - 1) as u64))
        .unwrap_or(end_day);

    let daily = state
        .db
        .analytics
        .daily_series(ctx.user_id, start_day, end_day)
        .await?;
    let links = state
        .db
        .analytics
        .link_breakdown(ctx.user_id, start_day, end_day)
        .await?;

    Ok(Json(StatsResponse {
        totals,
        window_days: Some(days),
        daily: Some(daily),
        links: Some(links),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_distinguishes_absent_from_null() {
        let patch: UpdateProfileRequest = serde_json::from_str(r#"{"bio": null}"#).unwrap();
        assert_eq!(patch.display_name, None);
        assert_eq!(patch.bio, Some(None));

        let patch: UpdateProfileRequest =
            serde_json::from_str(r#"{"display_name": "Alice"}"#).unwrap();
        assert_eq!(patch.display_name, Some(Some("Alice".to_string())));
        assert_eq!(patch.bio, None);
    }

    #[test]
    fn test_merge_text_keeps_clears_and_replaces() {
        let current = Some("old".to_string());
        assert_eq!(merge_text(current.clone(), None, 50, "f").unwrap(), current);
        assert_eq!(merge_text(current.clone(), Some(None), 50, "f").unwrap(), None);
        assert_eq!(
            merge_text(current.clone(), Some(Some("  new  ".to_string())), 50, "f").unwrap(),
            Some("new".to_string())
        );
        assert_eq!(
            merge_text(current, Some(Some("   ".to_string())), 50, "f").unwrap(),
            None
        );
    }

    #[test]
    fn test_merge_text_rejects_overlong_values() {
        let err = merge_text(None, Some(Some("x".repeat(51))), 50, "display_name").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_merge_avatar_url_requires_http() {
        let err = merge_avatar_url(None, Some(Some("ftp://example.com/a.png".to_string())))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let ok = merge_avatar_url(None, Some(Some("https://cdn.example.com/a.png".to_string())))
            .unwrap();
        assert_eq!(ok, Some("https://cdn.example.com/a.png".to_string()));
    }
}
