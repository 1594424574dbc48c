//! Linkfolio Core Library
//!
//! This crate provides the domain models, the entitlement engine, the PIX
//! payment-code encoder, error types, configuration, and validation shared
//! across all Linkfolio components.

pub mod config;
pub mod entitlement;
pub mod error;
pub mod hooks;
pub mod models;
pub mod pix;
pub mod validation;

// Re-export commonly used types
pub use config::{AppConfig, BaseConfig, Config, PlanPricing};
pub use entitlement::{
    compute_expiration, effective_tier, is_entitled, plan_state_for_grant, remaining_days,
    LinkLimits,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{NoOpProfileCacheInvalidator, ProfileCacheInvalidator};
pub use models::plan::{GrantDuration, PlanState, PlanTier};
pub use pix::{
    generate_pix_code, generate_pix_qr_svg, normalize_amount, resolve_transaction_id, PixConfig,
};
