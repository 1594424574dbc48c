//! Configuration module
//!
//! Environment-driven configuration for the API: server, database, auth,
//! CORS, PIX billing, and the plan price table. Loaded once at startup via
//! [`Config::from_env`], which fails fast on invalid values.

use std::env;

use rust_decimal::Decimal;

use crate::pix::PixConfig;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const DEFAULT_PORT: u16 = 3000;
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Base configuration shared by every part of the service
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
}

/// Plan price table in BRL, fed to the PIX encoder and exposed publicly so
/// clients can render upgrade offers.
#[derive(Clone, Debug)]
pub struct PlanPricing {
    pub pro_monthly: Decimal,
    pub pro_yearly: Decimal,
    pub diamond_monthly: Decimal,
    pub diamond_yearly: Decimal,
}

/// Full application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub max_request_body_size: usize,
    // PIX billing configuration. Billing routes reject requests until a key
    // is configured; everything else works without one.
    pub pix_key: Option<String>,
    pub pix_merchant_name: String,
    pub pix_merchant_city: String,
    pub pricing: PlanPricing,
}

/// Application configuration handle.
#[derive(Clone, Debug)]
pub struct Config(pub Box<AppConfig>);

impl Config {
    fn inner(&self) -> &AppConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.inner().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = AppConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.inner().base.jwt_expiry_hours
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn max_request_body_size(&self) -> usize {
        self.inner().max_request_body_size
    }

    /// PIX merchant configuration, if a key is set.
    pub fn pix_config(&self) -> Option<PixConfig> {
        self.inner().pix_key.as_ref().map(|key| {
            PixConfig::new(
                key.clone(),
                &self.inner().pix_merchant_name,
                &self.inner().pix_merchant_city,
            )
        })
    }

    pub fn pricing(&self) -> &PlanPricing {
        &self.inner().pricing
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const DEFAULT_PRICE_PRO_MONTHLY: &str = "19.90";
        const DEFAULT_PRICE_PRO_YEARLY: &str = "190.00";
        const DEFAULT_PRICE_DIAMOND_MONTHLY: &str = "39.90";
        const DEFAULT_PRICE_DIAMOND_YEARLY: &str = "390.00";

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ALLOWED_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| JWT_EXPIRY_HOURS.to_string())
                .parse()
                .unwrap_or(JWT_EXPIRY_HOURS),
            environment,
        };

        let pricing = PlanPricing {
            pro_monthly: parse_price("PRICE_PRO_MONTHLY", DEFAULT_PRICE_PRO_MONTHLY)?,
            pro_yearly: parse_price("PRICE_PRO_YEARLY", DEFAULT_PRICE_PRO_YEARLY)?,
            diamond_monthly: parse_price("PRICE_DIAMOND_MONTHLY", DEFAULT_PRICE_DIAMOND_MONTHLY)?,
            diamond_yearly: parse_price("PRICE_DIAMOND_YEARLY", DEFAULT_PRICE_DIAMOND_YEARLY)?,
        };

        let config = AppConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            max_request_body_size: env::var("MAX_REQUEST_BODY_SIZE")
                .unwrap_or_else(|_| MAX_REQUEST_BODY_BYTES.to_string())
                .parse()
                .unwrap_or(MAX_REQUEST_BODY_BYTES),
            pix_key: env::var("PIX_KEY").ok().filter(|s| !s.is_empty()),
            pix_merchant_name: env::var("PIX_MERCHANT_NAME")
                .unwrap_or_else(|_| "Linkfolio".to_string()),
            pix_merchant_city: env::var("PIX_MERCHANT_CITY")
                .unwrap_or_else(|_| "SAO PAULO".to_string()),
            pricing,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        // The PIX payload format carries these fields verbatim; non-ASCII
        // values would make the declared TLV lengths wrong for readers.
        if !self.pix_merchant_name.is_ascii() {
            return Err(anyhow::anyhow!("PIX_MERCHANT_NAME must be ASCII"));
        }
        if !self.pix_merchant_city.is_ascii() {
            return Err(anyhow::anyhow!("PIX_MERCHANT_CITY must be ASCII"));
        }
        if let Some(key) = &self.pix_key {
            if !key.is_ascii() {
                return Err(anyhow::anyhow!("PIX_KEY must be ASCII"));
            }
        }

        for (name, price) in [
            ("PRICE_PRO_MONTHLY", self.pricing.pro_monthly),
            ("PRICE_PRO_YEARLY", self.pricing.pro_yearly),
            ("PRICE_DIAMOND_MONTHLY", self.pricing.diamond_monthly),
            ("PRICE_DIAMOND_YEARLY", self.pricing.diamond_yearly),
        ] {
            if price <= Decimal::ZERO {
                return Err(anyhow::anyhow!("{} must be positive", name));
            }
        }

        Ok(())
    }
}

fn parse_price(var: &str, default: &str) -> Result<Decimal, anyhow::Error> {
    let raw = env::var(var).unwrap_or_else(|_| default.to_string());
    raw.parse::<Decimal>()
        .map_err(|_| anyhow::anyhow!("{} must be a decimal amount, got '{}'", var, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseConfig {
        BaseConfig {
            server_port: 3000,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 5,
            db_timeout_seconds: 30,
            jwt_secret: "a".repeat(32),
            jwt_expiry_hours: 24,
            environment: "development".to_string(),
        }
    }

    fn pricing() -> PlanPricing {
        PlanPricing {
            pro_monthly: "19.90".parse().unwrap(),
            pro_yearly: "190.00".parse().unwrap(),
            diamond_monthly: "39.90".parse().unwrap(),
            diamond_yearly: "390.00".parse().unwrap(),
        }
    }

    fn app_config() -> AppConfig {
        AppConfig {
            base: base(),
            database_url: "postgresql://localhost/linkfolio".to_string(),
            max_request_body_size: 1024 * 1024,
            pix_key: Some("123e4567-e89b-12d3-a456-426614174000".to_string()),
            pix_merchant_name: "Linkfolio".to_string(),
            pix_merchant_city: "SAO PAULO".to_string(),
            pricing: pricing(),
        }
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        assert!(app_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_jwt_secret() {
        let mut config = app_config();
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_postgres_url() {
        let mut config = app_config();
        config.database_url = "mysql://localhost/linkfolio".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_ascii_merchant_fields() {
        let mut config = app_config();
        config.pix_merchant_city = "S\u{e3}o Paulo".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let mut config = app_config();
        config.pricing.pro_monthly = Decimal::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pix_config_requires_key() {
        let mut inner = app_config();
        inner.pix_key = None;
        let config = Config(Box::new(inner));
        assert!(config.pix_config().is_none());

        let config = Config(Box::new(app_config()));
        let pix = config.pix_config().unwrap();
        assert_eq!(pix.merchant_name, "Linkfolio");
        assert_eq!(pix.merchant_city, "SAO PAULO");
    }

    #[test]
    fn test_is_production() {
        let mut inner = app_config();
        inner.base.environment = "production".to_string();
        assert!(Config(Box::new(inner)).is_production());
        assert!(!Config(Box::new(app_config())).is_production());
    }
}
