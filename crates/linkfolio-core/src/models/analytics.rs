use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifetime view and click totals for a profile
#[derive(Debug, Clone, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StatsTotals {
    pub total_views: i64,
    pub total_clicks: i64,
}

/// One day of profile activity within a requested window
#[derive(Debug, Clone, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct DailyCount {
    pub day: NaiveDate,
    pub views: i64,
    pub clicks: i64,
}

/// Click totals for a single link within a requested window
#[derive(Debug, Clone, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LinkClickStats {
    pub link_id: Uuid,
    pub title: String,
    pub clicks: i64,
}
