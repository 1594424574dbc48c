//! Service initialization and application state setup

use anyhow::Result;
use linkfolio_core::{Config, NoOpProfileCacheInvalidator, ProfileCacheInvalidator};
use linkfolio_db::{AnalyticsRepository, LinkRepository, UserRepository};
use sqlx::PgPool;
use std::sync::Arc;

use crate::services::EntitlementService;
use crate::state::{AppState, DbState};

/// Initialize all services and repositories, returning the application state
pub fn initialize_services(config: &Config, pool: PgPool) -> Result<Arc<AppState>> {
    let users = UserRepository::new(pool.clone());
    let links = LinkRepository::new(pool.clone());
    let analytics = AnalyticsRepository::new(pool.clone());

    // Single-process deployment has no edge cache to purge; the hook stays in
    // place so a CDN-backed invalidator can be swapped in.
    let invalidator: Arc<dyn ProfileCacheInvalidator> = Arc::new(NoOpProfileCacheInvalidator);

    let entitlements = EntitlementService::new(users.clone(), invalidator.clone());

    let state = Arc::new(AppState {
        db: DbState {
            pool,
            users,
            links,
            analytics,
        },
        entitlements,
        invalidator,
        config: config.clone(),
        is_production: config.is_production(),
    });

    tracing::info!("Services initialized");
    Ok(state)
}
