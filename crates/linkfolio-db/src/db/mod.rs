//! Database repositories for data access layer
//!
//! Each repository owns the queries for one domain entity. Plan expiration
//! is never evaluated here: repositories return stored rows as-is, and the
//! callers derive the effective tier at read time.

pub mod analytics;
pub mod links;
pub mod users;

pub use analytics::AnalyticsRepository;
pub use links::LinkRepository;
pub use users::UserRepository;
