use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::core::{ensure_non_negative, AppError, Result};
use crate::modules::pricing::models::Classification;
use crate::modules::pricing::services::{ClassificationResolver, WeightResolver};
use crate::modules::shipments::models::{InvoiceRequest, ShipmentVerification, VerificationRequest};
use crate::modules::shipments::repositories::InvoiceRequestRepository;

/// Applies operations' verification to an invoice request
pub struct VerificationService {
    repo: Arc<dyn InvoiceRequestRepository>,
    weights: WeightResolver,
    classifier: ClassificationResolver,
}

impl VerificationService {
    pub fn new(repo: Arc<dyn InvoiceRequestRepository>) -> Self {
        Self {
            repo,
            weights: WeightResolver::new(),
            classifier: ClassificationResolver::new(),
        }
    }

    /// Validate and store a verification snapshot.
    ///
    /// The insured flag always comes from the stored request; the payload
    /// cannot switch insurance validation off.
    pub async fn apply_verification(
        &self,
        request_id: &str,
        payload: VerificationRequest,
    ) -> Result<InvoiceRequest> {
        let request = self
            .repo
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("invoice request {}", request_id)))?;

        if !request.status.accepts_verification() {
            return Err(AppError::conflict(format!(
                "invoice request {} is {} and can no longer be verified",
                request.id, request.status
            )));
        }

        let expected_version = payload.expected_version.unwrap_or(request.version);
        let verification = self.build_verification(&request, &payload)?;
        let updated = self
            .repo
            .save_verification(&request.id, &verification, expected_version)
            .await?;

        info!(
            request_id = %updated.id,
            chargeable_weight = %verification.chargeable_weight,
            weight_basis = ?verification.weight_basis,
            boxes = verification.number_of_boxes,
            flomic_or_personal = verification.flomic_or_personal,
            version = updated.version,
            "Shipment verified"
        );

        Ok(updated)
    }

    fn build_verification(
        &self,
        request: &InvoiceRequest,
        payload: &VerificationRequest,
    ) -> Result<ShipmentVerification> {
        let weight = self.weights.resolve(&payload.weight_input())?;

        let mut boxes = payload
            .boxes
            .clone()
            .unwrap_or_else(|| request.boxes.clone());
        let number_of_boxes = match payload.number_of_boxes {
            Some(0) => {
                return Err(AppError::validation(
                    "number_of_boxes",
                    "at least one box is required",
                ))
            }
            Some(n) => n,
            None => u32::try_from(boxes.len().max(1)).map_err(|_| {
                AppError::validation("number_of_boxes", "too many boxes")
            })?,
        };

        let shipment = payload
            .shipment_classification
            .clone()
            .or_else(|| request.shipment_classification.clone());
        let box_classes: Vec<Option<Classification>> =
            boxes.iter().map(|b| b.classification.clone()).collect();
        let resolved = self
            .classifier
            .resolve(&request.service_route, shipment.as_ref(), &box_classes)?;
        for (detail, class) in boxes.iter_mut().zip(resolved.boxes) {
            detail.classification = class;
        }

        let declared_value = payload
            .declared_value
            .or(request.declared_value)
            .map(|v| ensure_non_negative("declared_value", v))
            .transpose()?;
        self.classifier
            .validate_insurance(&request.service_route, request.insured, declared_value)?;

        if let Some(rate) = payload.rate {
            if rate <= Decimal::ZERO {
                return Err(AppError::validation("rate", "rate must be greater than 0"));
            }
        }

        Ok(ShipmentVerification {
            actual_weight: weight.actual_weight,
            volumetric_weight: weight.volumetric_weight,
            chargeable_weight: weight.chargeable_weight,
            weight_basis: weight.weight_basis,
            number_of_boxes,
            shipment_classification: resolved.shipment,
            boxes,
            insured: request.insured,
            declared_value,
            rate: payload.rate,
            flomic_or_personal: resolved.flomic_or_personal,
            verified_by: payload.verified_by.clone(),
            verified_at: Utc::now(),
        })
    }
}
