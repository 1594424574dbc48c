//! Plan grant orchestration.
//!
//! Every plan mutation flows through [`EntitlementService::grant_plan`]: it
//! authorizes the actor, derives the stored state from the grant duration,
//! persists it as one single-row update, and signals profile-cache
//! revalidation. Removal is the same path with a FREE target. Read-side
//! gating lives in `linkfolio_core::entitlement` and is never evaluated
//! here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use linkfolio_core::models::User;
use linkfolio_core::{
    plan_state_for_grant, AppError, GrantDuration, PlanTier, ProfileCacheInvalidator,
};
use linkfolio_db::UserRepository;
use uuid::Uuid;

use crate::auth::AuthContext;

#[derive(Clone)]
pub struct EntitlementService {
    users: UserRepository,
    invalidator: Arc<dyn ProfileCacheInvalidator>,
}

impl EntitlementService {
    pub fn new(users: UserRepository, invalidator: Arc<dyn ProfileCacheInvalidator>) -> Self {
        Self { users, invalidator }
    }

    /// Grants `target_tier` to `user_id` for `duration`, replacing whatever
    /// plan state was stored before. The expiration is always computed from
    /// `now`; re-granting resets the clock rather than stacking.
    #[tracing::instrument(
        skip_all,
        fields(actor_id = %actor.user_id, user_id = %user_id, tier = %target_tier)
    )]
    pub async fn grant_plan(
        &self,
        actor: &AuthContext,
        user_id: Uuid,
        target_tier: PlanTier,
        duration: GrantDuration,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        if !actor.is_admin {
            return Err(AppError::Unauthorized(
                "Administrator privileges required".to_string(),
            ));
        }

        let state = plan_state_for_grant(target_tier, duration, now)?;
        let updated = self
            .users
            .update_plan(user_id, state.plan_type, state.pro_expires_at)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(
            plan = %updated.plan_type,
            expires_at = ?updated.pro_expires_at,
            "Plan grant applied"
        );
        self.invalidate(&updated).await;
        Ok(updated)
    }

    /// Removal routes through the grant path with a FREE target; the stored
    /// result is byte-identical to granting FREE.
    pub async fn remove_plan(
        &self,
        actor: &AuthContext,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        self.grant_plan(actor, user_id, PlanTier::Free, GrantDuration::Lifetime, now)
            .await
    }

    async fn invalidate(&self, user: &User) {
        if let Err(e) = self
            .invalidator
            .invalidate_profile(user.id, &user.username)
            .await
        {
            tracing::warn!(user_id = %user.id, error = %e, "Profile cache invalidation failed");
        }
    }
}
