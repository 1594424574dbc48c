use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::appearance::Appearance;
use super::plan::{PlanState, PlanTier};

/// User entity.
///
/// Plan columns and appearance columns live on the same row. `plan_type`
/// alone is never enough to decide access: expired grants keep their stored
/// tier, so entitlement is always derived from the full `PlanState` at read
/// time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub plan_type: PlanTier,
    pub pro_expires_at: Option<DateTime<Utc>>,
    pub theme: String,
    pub background: String,
    pub layout: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The entitlement-relevant subset of this row.
    pub fn plan_state(&self) -> PlanState {
        PlanState {
            plan_type: self.plan_type,
            pro_expires_at: self.pro_expires_at,
        }
    }

    /// The stored appearance selection, before any read-time downgrade.
    pub fn appearance(&self) -> Appearance {
        Appearance {
            theme: self.theme.clone(),
            background: self.background.clone(),
            layout: self.layout.clone(),
        }
    }
}
