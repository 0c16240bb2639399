use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;

use super::parse_env;
use crate::core::{AppError, Currency, Result};

/// What happens when a caller-supplied tracking code is malformed or already issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingCodePolicy {
    /// Replace it with a freshly generated code and log the substitution
    Substitute,
    /// Fail the request instead
    Reject,
}

impl std::str::FromStr for TrackingCodePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substitute" => Ok(TrackingCodePolicy::Substitute),
            "reject" => Ok(TrackingCodePolicy::Reject),
            _ => Err(format!("Invalid tracking code policy: {}", s)),
        }
    }
}

/// Business constants used by the invoice engine and the identifier generator
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// COD deliveries at or above this chargeable weight are free
    pub free_delivery_threshold_kg: Decimal,
    /// Delivery base amount when the caller declares none
    pub default_delivery_base_amount: Decimal,
    /// Tax-invoice delivery increment for every box after the first
    pub per_box_delivery_increment: Decimal,
    /// VAT rate in percent (5 means 5%)
    pub vat_rate_percent: Decimal,
    /// Fixed AWB prefix required on the outbound route
    pub outbound_awb_prefix: String,
    pub tracking_code_policy: TrackingCodePolicy,
    pub billing_currency: Currency,
    /// Optional YAML weight-bracket rate table
    pub rate_table_path: Option<String>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_delivery_threshold_kg: Decimal::new(30, 0),
            default_delivery_base_amount: Decimal::new(20, 0),
            per_box_delivery_increment: Decimal::new(5, 0),
            vat_rate_percent: Decimal::new(5, 0),
            outbound_awb_prefix: "PHL".to_string(),
            tracking_code_policy: TrackingCodePolicy::Substitute,
            billing_currency: Currency::AED,
            rate_table_path: None,
        }
    }
}

impl PricingConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(PricingConfig {
            free_delivery_threshold_kg: parse_env("FREE_DELIVERY_THRESHOLD_KG", "30")?,
            default_delivery_base_amount: parse_env("DEFAULT_DELIVERY_BASE_AMOUNT", "20")?,
            per_box_delivery_increment: parse_env("PER_BOX_DELIVERY_INCREMENT", "5")?,
            vat_rate_percent: parse_env("VAT_RATE_PERCENT", "5")?,
            outbound_awb_prefix: env::var("OUTBOUND_AWB_PREFIX")
                .map(|p| p.trim().to_uppercase())
                .unwrap_or(defaults.outbound_awb_prefix),
            tracking_code_policy: parse_env("TRACKING_CODE_POLICY", "substitute")?,
            billing_currency: parse_env("BILLING_CURRENCY", "AED")?,
            rate_table_path: env::var("RATE_TABLE_PATH").ok(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.free_delivery_threshold_kg <= Decimal::ZERO {
            return Err(AppError::Configuration(
                "FREE_DELIVERY_THRESHOLD_KG must be greater than 0".to_string(),
            ));
        }
        if self.default_delivery_base_amount < Decimal::ZERO
            || self.per_box_delivery_increment < Decimal::ZERO
        {
            return Err(AppError::Configuration(
                "Delivery amounts cannot be negative".to_string(),
            ));
        }
        if self.vat_rate_percent <= Decimal::ZERO || self.vat_rate_percent >= Decimal::ONE_HUNDRED
        {
            return Err(AppError::Configuration(
                "VAT_RATE_PERCENT must be between 0 and 100".to_string(),
            ));
        }
        let prefix = &self.outbound_awb_prefix;
        if prefix.len() != 3 || !prefix.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(AppError::Configuration(format!(
                "OUTBOUND_AWB_PREFIX must be three uppercase letters, got '{}'",
                prefix
            )));
        }
        Ok(())
    }
}
