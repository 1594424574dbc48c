//! Hooks and traits for deployment integration
//!
//! This module provides trait interfaces that let the core signal side
//! effects (cache purges, webhooks) without depending on the systems that
//! perform them. The hosting layer supplies real implementations.

use async_trait::async_trait;
use uuid::Uuid;

/// Trait for invalidating cached public profile pages
///
/// Called after any mutation that changes what `/p/{username}` renders:
/// profile edits, appearance changes, link changes, and plan grants.
/// Implementations must tolerate being called for usernames that were
/// never cached.
#[async_trait]
pub trait ProfileCacheInvalidator: Send + Sync {
    /// Drop any cached rendering of the user's public page
    async fn invalidate_profile(&self, user_id: Uuid, username: &str) -> Result<(), String>;
}

/// No-op implementation for deployments without an edge cache
pub struct NoOpProfileCacheInvalidator;

#[async_trait]
impl ProfileCacheInvalidator for NoOpProfileCacheInvalidator {
    async fn invalidate_profile(&self, _user_id: Uuid, _username: &str) -> Result<(), String> {
        Ok(())
    }
}
