use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subscription tier. DIAMOND grants the same capabilities as PRO plus a
/// cosmetic badge, so gating always compares ordinal ranks instead of
/// matching on individual tiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "plan_tier", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
    Diamond,
}

impl PlanTier {
    /// Ordinal rank used for entitlement comparisons: FREE < PRO < DIAMOND.
    pub const fn rank(self) -> u8 {
        match self {
            PlanTier::Free => 0,
            PlanTier::Pro => 1,
            PlanTier::Diamond => 2,
        }
    }

    pub const fn is_paid(self) -> bool {
        !matches!(self, PlanTier::Free)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Diamond => "diamond",
        }
    }
}

impl Default for PlanTier {
    fn default() -> Self {
        PlanTier::Free
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of a user row that drives entitlement decisions.
///
/// `pro_expires_at == None` means a lifetime grant when the tier is paid and
/// is meaningless for FREE. Expiration is observed lazily: a lapsed row keeps
/// its stored tier and every consumer derives the effective tier at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanState {
    pub plan_type: PlanTier,
    pub pro_expires_at: Option<DateTime<Utc>>,
}

impl PlanState {
    /// The default and terminal-safe state.
    pub const FREE: PlanState = PlanState {
        plan_type: PlanTier::Free,
        pro_expires_at: None,
    };

    pub fn new(plan_type: PlanTier, pro_expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            plan_type,
            pro_expires_at,
        }
    }

    pub fn is_lifetime(&self) -> bool {
        self.plan_type.is_paid() && self.pro_expires_at.is_none()
    }
}

impl Default for PlanState {
    fn default() -> Self {
        PlanState::FREE
    }
}

/// Duration of an admin plan grant. Exactly one variant applies per call.
///
/// Wire format is externally tagged: `{"days": 30}`, `{"months": 1}`,
/// `{"years": 1}` or `"lifetime"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GrantDuration {
    Days(u32),
    Months(u32),
    Years(u32),
    Lifetime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_rank_ordering() {
        assert!(PlanTier::Free.rank() < PlanTier::Pro.rank());
        assert!(PlanTier::Pro.rank() < PlanTier::Diamond.rank());
    }

    #[test]
    fn test_tier_is_paid() {
        assert!(!PlanTier::Free.is_paid());
        assert!(PlanTier::Pro.is_paid());
        assert!(PlanTier::Diamond.is_paid());
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(PlanTier::Free.to_string(), "free");
        assert_eq!(PlanTier::Pro.to_string(), "pro");
        assert_eq!(PlanTier::Diamond.to_string(), "diamond");
    }

    #[test]
    fn test_tier_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&PlanTier::Diamond).unwrap(),
            "\"diamond\""
        );
        let tier: PlanTier = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(tier, PlanTier::Pro);
    }

    #[test]
    fn test_grant_duration_wire_format() {
        assert_eq!(
            serde_json::to_string(&GrantDuration::Days(30)).unwrap(),
            "{\"days\":30}"
        );
        assert_eq!(
            serde_json::to_string(&GrantDuration::Lifetime).unwrap(),
            "\"lifetime\""
        );
        let d: GrantDuration = serde_json::from_str("{\"months\":1}").unwrap();
        assert_eq!(d, GrantDuration::Months(1));
        let d: GrantDuration = serde_json::from_str("\"lifetime\"").unwrap();
        assert_eq!(d, GrantDuration::Lifetime);
    }

    #[test]
    fn test_plan_state_lifetime() {
        assert!(!PlanState::FREE.is_lifetime());
        assert!(PlanState::new(PlanTier::Pro, None).is_lifetime());
        assert!(!PlanState::new(PlanTier::Pro, Some(Utc::now())).is_lifetime());
    }
}
