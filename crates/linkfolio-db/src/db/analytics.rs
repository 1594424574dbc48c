use chrono::NaiveDate;
use linkfolio_core::{
    models::{DailyCount, LinkClickStats, StatsTotals},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Repository for page view and link click events
///
/// Events are insert-only. Aggregations run over the raw event tables; date
/// bucketing uses the database session timezone, which deployments keep at
/// UTC.
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record one public page view
    #[tracing::instrument(skip(self), fields(db.table = "page_views", db.operation = "insert"))]
    pub async fn record_page_view(&self, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("INSERT INTO page_views (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record one click on an active, visible link, resolving the owner from
    /// the link row
    ///
    /// Returns false when the link does not exist, was deleted, or is hidden.
    #[tracing::instrument(skip(self), fields(db.table = "link_clicks", db.operation = "insert", db.record_id = %link_id))]
    pub async fn record_link_click(&self, link_id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query(
            r#"
            INSERT INTO link_clicks (link_id, user_id)
            SELECT id, user_id FROM links
            WHERE id = $1 AND deleted_at IS NULL AND is_visible
            "#,
        )
        .bind(link_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Lifetime view and click totals for a profile
    #[tracing::instrument(skip(self), fields(db.table = "page_views", db.operation = "aggregate"))]
    pub async fn totals(&self, user_id: Uuid) -> Result<StatsTotals, AppError> {
        let totals = sqlx::query_as::<Postgres, StatsTotals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM page_views WHERE user_id = $1)::BIGINT AS total_views,
                (SELECT COUNT(*) FROM link_clicks WHERE user_id = $1)::BIGINT AS total_clicks
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Views and clicks per day over an inclusive date window, zero-filled
    #[tracing::instrument(skip(self), fields(db.table = "page_views", db.operation = "aggregate"))]
    pub async fn daily_series(
        &self,
        user_id: Uuid,
        start_day: NaiveDate,
        end_day: NaiveDate,
    ) -> Result<Vec<DailyCount>, AppError> {
        let series = sqlx::query_as::<Postgres, DailyCount>(
            r#"
            SELECT gs.day::date AS day,
                   COALESCE(v.views, 0)::BIGINT AS views,
                   COALESCE(c.clicks, 0)::BIGINT AS clicks
            FROM generate_series($2::date, $3::date, interval '1 day') AS gs(day)
            LEFT JOIN (
                SELECT viewed_at::date AS day, COUNT(*) AS views
                FROM page_views
                WHERE user_id = $1 AND viewed_at::date BETWEEN $2 AND $3
                GROUP BY 1
            ) v ON v.day = gs.day::date
            LEFT JOIN (
                SELECT clicked_at::date AS day, COUNT(*) AS clicks
                FROM link_clicks
                WHERE user_id = $1 AND clicked_at::date BETWEEN $2 AND $3
                GROUP BY 1
            ) c ON c.day = gs.day::date
            ORDER BY gs.day ASC
            "#,
        )
        .bind(user_id)
        .bind(start_day)
        .bind(end_day)
        .fetch_all(&self.pool)
        .await?;

        Ok(series)
    }

    /// Click totals per active link over an inclusive date window
    ///
    /// Active links with no clicks in the window are included with a zero
    /// count. Soft-deleted links are excluded even if they were clicked.
    #[tracing::instrument(skip(self), fields(db.table = "link_clicks", db.operation = "aggregate"))]
    pub async fn link_breakdown(
        &self,
        user_id: Uuid,
        start_day: NaiveDate,
        end_day: NaiveDate,
    ) -> Result<Vec<LinkClickStats>, AppError> {
        let breakdown = sqlx::query_as::<Postgres, LinkClickStats>(
            r#"
            SELECT l.id AS link_id,
                   l.title,
                   COALESCE(c.clicks, 0)::BIGINT AS clicks
            FROM links l
            LEFT JOIN (
                SELECT link_id, COUNT(*) AS clicks
                FROM link_clicks
                WHERE user_id = $1 AND clicked_at::date BETWEEN $2 AND $3
                GROUP BY link_id
            ) c ON c.link_id = l.id
            WHERE l.user_id = $1 AND l.deleted_at IS NULL
            ORDER BY clicks DESC, l.position ASC
            "#,
        )
        .bind(user_id)
        .bind(start_day)
        .bind(end_day)
        .fetch_all(&self.pool)
        .await?;

        Ok(breakdown)
    }
}
