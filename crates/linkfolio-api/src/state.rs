//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use linkfolio_core::{Config, ProfileCacheInvalidator};
use linkfolio_db::{AnalyticsRepository, LinkRepository, UserRepository};
use sqlx::PgPool;

use crate::services::EntitlementService;

/// Database repositories plus the raw pool for health checks.
#[derive(Clone)]
pub struct DbState {
    pub pool: PgPool,
    pub users: UserRepository,
    pub links: LinkRepository,
    pub analytics: AnalyticsRepository,
}

pub struct AppState {
    pub db: DbState,
    pub entitlements: EntitlementService,
    pub invalidator: Arc<dyn ProfileCacheInvalidator>,
    pub config: Config,
    pub is_production: bool,
}

impl FromRef<Arc<AppState>> for DbState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.db.clone()
    }
}

impl FromRef<Arc<AppState>> for EntitlementService {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.entitlements.clone()
    }
}

// Compile-time check that the shared state can cross task boundaries.
fn _assert_app_state_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AppState>();
}
