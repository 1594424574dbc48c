//! Database access layer for Linkfolio
//!
//! PostgreSQL repositories over sqlx. All queries are scoped to the owning
//! user where the schema has an owner column.

pub mod db;

pub use db::{AnalyticsRepository, LinkRepository, UserRepository};
