//! Domain models for Linkfolio

pub mod analytics;
pub mod appearance;
pub mod link;
pub mod plan;
pub mod user;

pub use analytics::{DailyCount, LinkClickStats, StatsTotals};
pub use appearance::{Appearance, CatalogEntry, BACKGROUNDS, LAYOUTS, THEMES};
pub use link::Link;
pub use plan::{GrantDuration, PlanState, PlanTier};
pub use user::User;
