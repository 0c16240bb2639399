// Weight-bracket rate table
//
// Rates are maintained outside this service and loaded from YAML:
//
//   lanes:
//     outbound:
//       - { min_kg: "0",  max_kg: "15", rate_per_kg: "18.50" }
//       - { min_kg: "15", rate_per_kg: "16.00" }
//   routes:
//     UAE_TO_PINAS_SEA:
//       - { min_kg: "0", rate_per_kg: "9.75" }
//
// Route-code entries take precedence over lane entries. Brackets are
// half-open [min_kg, max_kg); a bracket without max_kg is open-ended.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::route::{Lane, ServiceRoute};
use crate::core::{AppError, Result};

/// Source of per-kg rates
pub trait RateTable: Send + Sync {
    fn rate_for(&self, route: &ServiceRoute, chargeable_weight: Decimal) -> Option<Decimal>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBracket {
    pub min_kg: Decimal,
    #[serde(default)]
    pub max_kg: Option<Decimal>,
    pub rate_per_kg: Decimal,
}

impl RateBracket {
    fn contains(&self, weight: Decimal) -> bool {
        weight >= self.min_kg && self.max_kg.map_or(true, |max| weight < max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRateTable {
    #[serde(default)]
    pub lanes: HashMap<Lane, Vec<RateBracket>>,
    #[serde(default)]
    pub routes: HashMap<String, Vec<RateBracket>>,
}

impl BracketRateTable {
    pub fn from_yaml(source: &str) -> Result<Self> {
        let table: BracketRateTable = serde_yaml::from_str(source)
            .map_err(|e| AppError::Configuration(format!("Invalid rate table: {}", e)))?;
        table.validate()?;
        Ok(table)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Cannot read rate table {}: {}", path, e))
        })?;
        Self::from_yaml(&source)
    }

    fn validate(&self) -> Result<()> {
        let all = self.lanes.values().chain(self.routes.values());
        for bracket in all.flatten() {
            if bracket.rate_per_kg < Decimal::ZERO || bracket.min_kg < Decimal::ZERO {
                return Err(AppError::Configuration(
                    "Rate table entries cannot be negative".to_string(),
                ));
            }
            if let Some(max) = bracket.max_kg {
                if max <= bracket.min_kg {
                    return Err(AppError::Configuration(format!(
                        "Rate bracket max_kg {} must exceed min_kg {}",
                        max, bracket.min_kg
                    )));
                }
            }
        }
        Ok(())
    }
}

impl RateTable for BracketRateTable {
    fn rate_for(&self, route: &ServiceRoute, chargeable_weight: Decimal) -> Option<Decimal> {
        let brackets = self
            .routes
            .get(route.code())
            .or_else(|| self.lanes.get(&route.lane()))?;

        brackets
            .iter()
            .find(|bracket| bracket.contains(chargeable_weight))
            .map(|bracket| bracket.rate_per_kg)
    }
}
