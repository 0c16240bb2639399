use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::pricing::models::{Classification, WeightBasis};
use crate::modules::pricing::services::WeightInput;

/// One physical box of a shipment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxDetail {
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub length_cm: Option<Decimal>,
    #[serde(default)]
    pub width_cm: Option<Decimal>,
    #[serde(default)]
    pub height_cm: Option<Decimal>,
    #[serde(default)]
    pub weight_kg: Option<Decimal>,
}

/// Operations' verified measurements; read-only to finance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentVerification {
    pub actual_weight: Decimal,
    pub volumetric_weight: Decimal,
    pub chargeable_weight: Decimal,
    pub weight_basis: WeightBasis,
    pub number_of_boxes: u32,
    pub shipment_classification: Option<Classification>,
    pub boxes: Vec<BoxDetail>,
    pub insured: bool,
    pub declared_value: Option<Decimal>,
    /// Manually set or system-suggested per-kg rate
    pub rate: Option<Decimal>,
    pub flomic_or_personal: bool,
    pub verified_by: Option<String>,
    pub verified_at: DateTime<Utc>,
}

/// Verification update submitted by operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// Version of the invoice request the caller read; when absent the
    /// version loaded by the service is used
    #[serde(default)]
    pub expected_version: Option<i64>,
    #[serde(default)]
    pub actual_weight: Option<Decimal>,
    #[serde(default)]
    pub volumetric_weight: Option<Decimal>,
    #[serde(default)]
    pub chargeable_weight: Option<Decimal>,
    #[serde(default)]
    pub total_kg: Option<Decimal>,
    #[serde(default)]
    pub number_of_boxes: Option<u32>,
    #[serde(default)]
    pub shipment_classification: Option<Classification>,
    #[serde(default)]
    pub boxes: Option<Vec<BoxDetail>>,
    #[serde(default)]
    pub declared_value: Option<Decimal>,
    #[serde(default)]
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub verified_by: Option<String>,
}

impl VerificationRequest {
    pub fn weight_input(&self) -> WeightInput {
        WeightInput {
            actual_weight: self.actual_weight,
            volumetric_weight: self.volumetric_weight,
            chargeable_weight: self.chargeable_weight,
            total_kg: self.total_kg,
        }
    }
}
