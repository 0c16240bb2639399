use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::pricing::models::{ResolvedWeight, WeightBasis};

/// Raw weight fields as captured during verification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightInput {
    pub actual_weight: Option<Decimal>,
    pub volumetric_weight: Option<Decimal>,
    /// Manual chargeable weight override
    pub chargeable_weight: Option<Decimal>,
    /// Legacy manual override; used when `chargeable_weight` is absent
    pub total_kg: Option<Decimal>,
}

/// Derives chargeable weight and weight basis
pub struct WeightResolver;

impl WeightResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the chargeable weight.
    ///
    /// `weight_basis` always compares the raw weights, so a manual override
    /// changes what is billed but never what the basis reports.
    pub fn resolve(&self, input: &WeightInput) -> Result<ResolvedWeight> {
        let actual = Self::require_weight("actual_weight", input.actual_weight)?;
        let volumetric = Self::require_weight("volumetric_weight", input.volumetric_weight)?;

        let weight_basis = if actual >= volumetric {
            WeightBasis::Actual
        } else {
            WeightBasis::Volumetric
        };

        let manual = input
            .chargeable_weight
            .map(|w| ("chargeable_weight", w))
            .or_else(|| input.total_kg.map(|w| ("total_kg", w)));

        let (chargeable_weight, overridden) = match manual {
            Some((field, weight)) => {
                if weight <= Decimal::ZERO {
                    return Err(AppError::validation(
                        field,
                        "manual chargeable weight must be greater than 0",
                    ));
                }
                (weight, true)
            }
            None => (actual.max(volumetric), false),
        };

        Ok(ResolvedWeight {
            actual_weight: actual,
            volumetric_weight: volumetric,
            chargeable_weight,
            weight_basis,
            overridden,
        })
    }

    fn require_weight(field: &str, value: Option<Decimal>) -> Result<Decimal> {
        let weight = value.ok_or_else(|| AppError::validation(field, "weight is required"))?;
        if weight < Decimal::ZERO {
            return Err(AppError::validation(field, "weight cannot be negative"));
        }
        Ok(weight)
    }
}

impl Default for WeightResolver {
    fn default() -> Self {
        Self::new()
    }
}
