//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use linkfolio_core::Config;

/// Validate critical configuration values
///
/// This function checks that critical configuration is set correctly and will
/// fail fast if there are issues that could cause security problems or runtime errors.
///
/// # Arguments
/// * `config` - Application configuration to validate
///
/// # Returns
/// Ok(()) if validation passes, Err with details if validation fails
pub fn validate_config(config: &Config) -> Result<()> {
    // Core field checks (JWT secret length, database URL shape, PIX fields, prices)
    config.validate()?;

    // Validate production mode detection
    let is_production = config.is_production();
    let env_var = std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .ok();

    if is_production && env_var.is_none() {
        tracing::warn!(
            "Production mode detected but ENVIRONMENT/APP_ENV not set - error details may leak"
        );
    }

    // Validate CORS configuration in production
    if is_production {
        let cors_origins = config.cors_origins();
        if cors_origins.contains(&"*".to_string()) {
            return Err(anyhow::anyhow!(
                "CORS configured to allow all origins (*) in production - this is a security risk. \
                Please set specific allowed origins via CORS_ALLOWED_ORIGINS environment variable."
            ));
        }
    }

    // Validate database connection settings
    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    if config.pix_config().is_none() {
        tracing::warn!("PIX_KEY not set - billing routes will reject charge requests");
    }

    Ok(())
}
