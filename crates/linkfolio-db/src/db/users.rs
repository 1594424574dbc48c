use chrono::{DateTime, Utc};
use linkfolio_core::{
    models::{PlanTier, User},
    AppError,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, display_name, bio, avatar_url, \
     is_admin, plan_type, pro_expires_at, theme, background, layout, created_at, updated_at";

/// Repository for managing user accounts and their plan columns
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user on the default free plan
    #[tracing::instrument(skip(self, email, password_hash), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<Postgres, User>(&sql)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<Postgres, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<Postgres, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self, email), fields(db.table = "users", db.operation = "select"))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<Postgres, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Overwrite the profile columns
    ///
    /// Callers merge partial updates against the current row first, so every
    /// column is written on each call.
    #[tracing::instrument(skip_all, fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    pub async fn update_profile(
        &self,
        id: Uuid,
        display_name: Option<&str>,
        bio: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET display_name = $2, bio = $3, avatar_url = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<Postgres, User>(&sql)
            .bind(id)
            .bind(display_name)
            .bind(bio)
            .bind(avatar_url)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Overwrite the appearance columns
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    pub async fn update_appearance(
        &self,
        id: Uuid,
        theme: &str,
        background: &str,
        layout: &str,
    ) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET theme = $2, background = $3, layout = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<Postgres, User>(&sql)
            .bind(id)
            .bind(theme)
            .bind(background)
            .bind(layout)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Overwrite the stored plan columns
    ///
    /// Expired rows are rewritten only through explicit grants; expiration
    /// itself never triggers a write.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    pub async fn update_plan(
        &self,
        id: Uuid,
        plan_type: PlanTier,
        pro_expires_at: Option<DateTime<Utc>>,
    ) -> Result<Option<User>, AppError> {
        let sql = format!(
            r#"
            UPDATE users
            SET plan_type = $2, pro_expires_at = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<Postgres, User>(&sql)
            .bind(id)
            .bind(plan_type)
            .bind(pro_expires_at)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// List users for the admin surface, newest first
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id ASC LIMIT $1 OFFSET $2"
        );
        let users = sqlx::query_as::<Postgres, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn count_users(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Map duplicate username/email inserts onto a conflict error
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let message = match db.constraint() {
                Some("users_username_key") => "Username is already taken",
                Some("users_email_key") => "Email is already registered",
                _ => "Username or email is already taken",
            };
            return AppError::Conflict(message.to_string());
        }
    }
    e.into()
}
