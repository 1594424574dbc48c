//! The entitlement engine.
//!
//! Every feature gate in the application (theme/background/layout selection,
//! link-count limits, analytics visibility, the public-page badge) routes
//! through [`is_entitled`] instead of re-deriving the check locally.
//!
//! Expiration is lazy: no job ever rewrites a lapsed row back to FREE, so a
//! stored `plan_type` alone means nothing. Consumers either call
//! [`is_entitled`] or read the derived [`effective_tier`], both computed
//! fresh against the caller-supplied clock.

use chrono::{DateTime, Days, Months, Utc};

use crate::error::AppError;
use crate::models::appearance::{find_entry, CatalogEntry};
use crate::models::link::Link;
use crate::models::plan::{GrantDuration, PlanState, PlanTier};

/// Whether `state` is currently entitled to `required`.
///
/// Pure: `rank(plan_type) >= rank(required)` and the grant has not lapsed
/// (`pro_expires_at` is absent or strictly in the future). At the exact
/// expiration instant the user is no longer entitled.
///
/// A `required` of FREE is always entitled; FREE has no expiration concept.
pub fn is_entitled(state: &PlanState, required: PlanTier, now: DateTime<Utc>) -> bool {
    if required == PlanTier::Free {
        return true;
    }
    if state.plan_type.rank() < required.rank() {
        return false;
    }
    match state.pro_expires_at {
        None => true,
        Some(expires) => expires > now,
    }
}

/// The tier `state` effectively holds at `now`: the stored tier while its
/// grant is active, FREE once it lapses. Derived per read, never written
/// back to the store.
pub fn effective_tier(state: &PlanState, now: DateTime<Utc>) -> PlanTier {
    if is_entitled(state, state.plan_type, now) {
        state.plan_type
    } else {
        PlanTier::Free
    }
}

/// Whole days left on the current grant, rounded up and floored at zero.
///
/// Returns `None` for FREE and for lifetime grants. A lapsed grant reports
/// `Some(0)`; whether the user is still entitled is [`is_entitled`]'s
/// answer, not this function's.
pub fn remaining_days(state: &PlanState, now: DateTime<Utc>) -> Option<i64> {
    if state.plan_type == PlanTier::Free {
        return None;
    }
    let expires = state.pro_expires_at?;
    const DAY_MS: i64 = 86_400_000;
    let millis = (expires - now).num_milliseconds();
    if millis <= 0 {
        return Some(0);
    }
    Some((millis + DAY_MS - 1) / DAY_MS)
}

/// Expiration timestamp for a grant of `duration` issued at `now`.
///
/// Always computed from `now`, never from any prior expiration: re-granting
/// resets the clock, it does not stack remaining time. Month and year
/// offsets use calendar-aware addition, so one month past Jan 31 is the
/// last day of February.
pub fn compute_expiration(
    now: DateTime<Utc>,
    duration: GrantDuration,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let expires = match duration {
        GrantDuration::Lifetime => return Ok(None),
        GrantDuration::Days(n) => now.checked_add_days(Days::new(n as u64)),
        GrantDuration::Months(n) => now.checked_add_months(Months::new(n)),
        GrantDuration::Years(n) => n
            .checked_mul(12)
            .and_then(|months| now.checked_add_months(Months::new(months))),
    };
    expires
        .map(Some)
        .ok_or_else(|| AppError::InvalidInput("grant duration is out of range".to_string()))
}

/// The stored state a grant produces. Granting FREE ignores the duration and
/// lands on `{FREE, None}` unconditionally, which is exactly what plan
/// removal does.
pub fn plan_state_for_grant(
    target_tier: PlanTier,
    duration: GrantDuration,
    now: DateTime<Utc>,
) -> Result<PlanState, AppError> {
    if target_tier == PlanTier::Free {
        return Ok(PlanState::FREE);
    }
    let pro_expires_at = compute_expiration(now, duration)?;
    Ok(PlanState {
        plan_type: target_tier,
        pro_expires_at,
    })
}

/// Link-count limits per plan state.
pub struct LinkLimits;

impl LinkLimits {
    /// Hard cap on active links for users without a paid entitlement.
    pub const FREE_MAX_ACTIVE: i64 = 3;

    /// Maximum number of active links `state` may hold at `now`.
    /// `None` means unlimited.
    pub fn max_active_links(state: &PlanState, now: DateTime<Utc>) -> Option<i64> {
        if is_entitled(state, PlanTier::Pro, now) {
            None
        } else {
            Some(Self::FREE_MAX_ACTIVE)
        }
    }
}

/// Gate for selecting a catalog entry (theme, background or layout).
/// Unknown identifiers are invalid input; premium identifiers require an
/// active PRO entitlement.
pub fn check_appearance_selection(
    catalog: &'static [CatalogEntry],
    id: &str,
    state: &PlanState,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let entry = find_entry(catalog, id)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown appearance option '{}'", id)))?;
    if entry.premium && !is_entitled(state, PlanTier::Pro, now) {
        return Err(AppError::SubscriptionRequired(format!(
            "'{}' requires an active PRO plan",
            id
        )));
    }
    Ok(())
}

/// Read-time filter for the public page.
///
/// Takes the ordered active link list. Without entitlement only the first
/// [`LinkLimits::FREE_MAX_ACTIVE`] links stay on the page; the excess is
/// hidden, never deleted, so a lapsed grant is always non-destructive. The
/// per-link visibility toggle applies after the cap, keeping the capped
/// window stable regardless of toggles.
pub fn public_links(links: Vec<Link>, entitled: bool) -> Vec<Link> {
    let capped: Vec<Link> = if entitled {
        links
    } else {
        links
            .into_iter()
            .take(LinkLimits::FREE_MAX_ACTIVE as usize)
            .collect()
    };
    capped.into_iter().filter(|link| link.is_visible).collect()
}
