//! Domain services composing repositories with core logic.

pub mod entitlement;

pub use entitlement::EntitlementService;
