//! Shared constants for the HTTP surface.

/// Prefix for every versioned API route.
pub const API_PREFIX: &str = "/api/v1";

/// Default cap on concurrently processed requests, overridable via
/// `HTTP_CONCURRENCY_LIMIT`.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 256;

/// Default and maximum window for the stats endpoints, in days.
pub const DEFAULT_STATS_WINDOW_DAYS: u32 = 30;
pub const MAX_STATS_WINDOW_DAYS: u32 = 90;
