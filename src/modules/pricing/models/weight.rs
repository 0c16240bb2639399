use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which raw weight the chargeable weight came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeightBasis {
    Actual,
    Volumetric,
}

/// Output of weight resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedWeight {
    pub actual_weight: Decimal,
    pub volumetric_weight: Decimal,
    /// max(actual, volumetric) unless a manual override was supplied
    pub chargeable_weight: Decimal,
    /// Always derived from the two raw weights, never from the override
    pub weight_basis: WeightBasis,
    pub overridden: bool,
}
