use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod carrier;
pub mod database;
pub mod pricing;
pub mod server;

pub use carrier::CarrierConfig;
pub use database::DatabaseConfig;
pub use pricing::{PricingConfig, TrackingCodePolicy};
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub carrier: CarrierConfig,
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let log_format = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            other => {
                return Err(AppError::Configuration(format!(
                    "Invalid LOG_FORMAT '{}'",
                    other
                )))
            }
        };

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            carrier: CarrierConfig::from_env()?,
            pricing: PricingConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections < self.database.pool_size {
            return Err(AppError::Configuration(
                "DATABASE_MAX_CONNECTIONS must be at least DATABASE_POOL_SIZE".to_string(),
            ));
        }

        self.carrier.validate()?;
        self.pricing.validate()?;

        Ok(())
    }
}

/// Reads an environment variable and parses it, falling back to a default
pub(crate) fn parse_env<T: std::str::FromStr>(key: &str, default: &str) -> Result<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", key)))
}
