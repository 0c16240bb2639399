use serde::Deserialize;
use std::env;

use super::parse_env;
use crate::core::{AppError, Result};

/// External carrier platform connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct CarrierConfig {
    pub base_url: String,
    pub api_key: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl CarrierConfig {
    pub fn from_env() -> Result<Self> {
        Ok(CarrierConfig {
            base_url: env::var("CARRIER_BASE_URL")
                .unwrap_or_else(|_| "https://api.carrier.example".to_string()),
            api_key: env::var("CARRIER_API_KEY")
                .map_err(|_| AppError::Configuration("CARRIER_API_KEY not set".to_string()))?,
            max_retries: parse_env("CARRIER_MAX_RETRIES", "3")?,
            timeout_secs: parse_env("CARRIER_TIMEOUT_SECS", "15")?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "CARRIER_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        if !self.base_url.starts_with("http") {
            return Err(AppError::Configuration(format!(
                "CARRIER_BASE_URL is not an http(s) URL: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}
