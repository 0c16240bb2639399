use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::pricing::models::{Classification, Lane, ServiceRoute};

/// Classification after route rules were applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClassification {
    pub shipment: Option<Classification>,
    /// Per-box values, positionally matching the input boxes
    pub boxes: Vec<Option<Classification>>,
    /// Any box or the shipment itself is FLOMIC/PERSONAL
    pub flomic_or_personal: bool,
}

/// Applies per-route classification and insurance rules
pub struct ClassificationResolver;

impl ClassificationResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve shipment and per-box classification for a route.
    ///
    /// Outbound forces GENERAL everywhere. Inbound requires COMMERCIAL or
    /// FLOMIC at shipment level; boxes may also carry PERSONAL. Other routes
    /// keep whatever the caller sent.
    pub fn resolve(
        &self,
        route: &ServiceRoute,
        shipment: Option<&Classification>,
        boxes: &[Option<Classification>],
    ) -> Result<ResolvedClassification> {
        let resolved = match route.lane() {
            Lane::Outbound => {
                let overridden = shipment.map_or(false, |c| *c != Classification::General)
                    || boxes
                        .iter()
                        .any(|b| b.as_ref().map_or(false, |c| *c != Classification::General));
                if overridden {
                    info!(
                        route = %route,
                        requested = ?shipment,
                        "Outbound classification forced to GENERAL"
                    );
                }

                ResolvedClassification {
                    shipment: Some(Classification::General),
                    boxes: vec![Some(Classification::General); boxes.len()],
                    flomic_or_personal: false,
                }
            }
            Lane::Inbound => {
                match shipment {
                    Some(Classification::Commercial) | Some(Classification::Flomic) => {}
                    Some(other) => {
                        return Err(AppError::validation(
                            "shipment_classification",
                            format!(
                                "inbound shipments must be COMMERCIAL or FLOMIC, got {}",
                                other
                            ),
                        ))
                    }
                    None => {
                        return Err(AppError::validation(
                            "shipment_classification",
                            "inbound shipments require a classification (COMMERCIAL or FLOMIC)",
                        ))
                    }
                }

                for (idx, value) in boxes.iter().enumerate() {
                    if let Some(c) = value {
                        if !matches!(
                            c,
                            Classification::Commercial
                                | Classification::Flomic
                                | Classification::Personal
                        ) {
                            return Err(AppError::validation(
                                format!("boxes[{}].classification", idx),
                                format!("{} is not allowed on inbound routes", c),
                            ));
                        }
                    }
                }

                ResolvedClassification {
                    shipment: shipment.cloned(),
                    boxes: boxes.to_vec(),
                    flomic_or_personal: Self::any_flomic_or_personal(shipment, boxes),
                }
            }
            Lane::Other => ResolvedClassification {
                shipment: shipment.cloned(),
                boxes: boxes.to_vec(),
                flomic_or_personal: Self::any_flomic_or_personal(shipment, boxes),
            },
        };

        Ok(resolved)
    }

    /// Inbound insured shipments need a positive declared value.
    ///
    /// `insured` must come from the stored record, not from the request
    /// being processed.
    pub fn validate_insurance(
        &self,
        route: &ServiceRoute,
        insured: bool,
        declared_value: Option<Decimal>,
    ) -> Result<()> {
        if !route.is_inbound() || !insured {
            return Ok(());
        }

        match declared_value {
            Some(value) if value > Decimal::ZERO => Ok(()),
            _ => Err(AppError::validation(
                "declared_value",
                "insured inbound shipments require a declared value greater than 0",
            )),
        }
    }

    fn any_flomic_or_personal(
        shipment: Option<&Classification>,
        boxes: &[Option<Classification>],
    ) -> bool {
        shipment.map_or(false, Classification::is_flomic_or_personal)
            || boxes
                .iter()
                .flatten()
                .any(Classification::is_flomic_or_personal)
    }
}

impl Default for ClassificationResolver {
    fn default() -> Self {
        Self::new()
    }
}
