use std::collections::HashSet;

use linkfolio_core::{models::Link, AppError};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const LINK_COLUMNS: &str =
    "id, user_id, title, url, position, is_visible, deleted_at, created_at, updated_at";

/// Repository for managing profile links
///
/// Links are soft-deleted: rows keep their `deleted_at` timestamp and every
/// read filters on `deleted_at IS NULL`. Mutations that depend on the set of
/// active links take a per-user row lock so cap checks and position
/// assignment cannot race.
#[derive(Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a link, enforcing the caller-supplied active-link cap
    ///
    /// `max_active` of `None` means unlimited. The new link is appended after
    /// the highest active position.
    #[tracing::instrument(skip(self, title, url), fields(db.table = "links", db.operation = "insert"))]
    pub async fn create_capped(
        &self,
        user_id: Uuid,
        title: &str,
        url: &str,
        max_active: Option<i64>,
    ) -> Result<Link, AppError> {
        let mut tx = self.pool.begin().await?;

        let owner: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if owner.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        if let Some(limit) = max_active {
            let used: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM links WHERE user_id = $1 AND deleted_at IS NULL",
            )
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

            if used >= limit {
                return Err(AppError::LinkLimitExceeded { used, limit });
            }
        }

        let sql = format!(
            r#"
            INSERT INTO links (user_id, title, url, position)
            SELECT $1, $2, $3, COALESCE(MAX(position) + 1, 0)
            FROM links
            WHERE user_id = $1 AND deleted_at IS NULL
            RETURNING {LINK_COLUMNS}
            "#
        );
        let link = sqlx::query_as::<Postgres, Link>(&sql)
            .bind(user_id)
            .bind(title)
            .bind(url)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(link)
    }

    /// Partially update an active link owned by the user
    #[tracing::instrument(skip(self, title, url), fields(db.table = "links", db.operation = "update", db.record_id = %id))]
    pub async fn update_link(
        &self,
        user_id: Uuid,
        id: Uuid,
        title: Option<&str>,
        url: Option<&str>,
        is_visible: Option<bool>,
    ) -> Result<Option<Link>, AppError> {
        let sql = format!(
            r#"
            UPDATE links
            SET title = COALESCE($3, title),
                url = COALESCE($4, url),
                is_visible = COALESCE($5, is_visible),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING {LINK_COLUMNS}
            "#
        );
        let link = sqlx::query_as::<Postgres, Link>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(title)
            .bind(url)
            .bind(is_visible)
            .fetch_optional(&self.pool)
            .await?;

        Ok(link)
    }

    /// Soft-delete an active link owned by the user
    #[tracing::instrument(skip(self), fields(db.table = "links", db.operation = "update", db.record_id = %id))]
    pub async fn soft_delete(&self, user_id: Uuid, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query(
            "UPDATE links SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Rewrite positions from an explicit ordering of every active link
    ///
    /// The id list must match the set of active links exactly; a stale list
    /// is rejected rather than partially applied.
    #[tracing::instrument(skip(self, ordered_ids), fields(db.table = "links", db.operation = "update"))]
    pub async fn reorder(&self, user_id: Uuid, ordered_ids: &[Uuid]) -> Result<Vec<Link>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let active_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM links WHERE user_id = $1 AND deleted_at IS NULL")
                .bind(user_id)
                .fetch_all(&mut *tx)
                .await?;

        let expected: HashSet<Uuid> = active_ids.iter().copied().collect();
        let provided: HashSet<Uuid> = ordered_ids.iter().copied().collect();
        if provided.len() != ordered_ids.len() || expected != provided {
            return Err(AppError::InvalidInput(
                "Reorder must list every active link exactly once".to_string(),
            ));
        }

        let positions: Vec<i32> = (0..ordered_ids.len() as i32).collect();
        sqlx::query(
            r#"
            UPDATE links AS l
            SET position = u.pos, updated_at = NOW()
            FROM UNNEST($2::uuid[], $3::int4[]) AS u(id, pos)
            WHERE l.id = u.id AND l.user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(ordered_ids)
        .bind(&positions)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 AND deleted_at IS NULL ORDER BY position ASC, created_at ASC"
        );
        let links = sqlx::query_as::<Postgres, Link>(&sql)
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(links)
    }

    /// List the user's active links in display order
    #[tracing::instrument(skip(self), fields(db.table = "links", db.operation = "select"))]
    pub async fn list_active(&self, user_id: Uuid) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = $1 AND deleted_at IS NULL ORDER BY position ASC, created_at ASC"
        );
        let links = sqlx::query_as::<Postgres, Link>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(links)
    }

    #[tracing::instrument(skip(self), fields(db.table = "links", db.operation = "select"))]
    pub async fn count_active(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM links WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
