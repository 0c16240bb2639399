use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::core::{ensure_non_negative, AppError, Result};
use crate::modules::identifiers::IdentifierGenerator;
use crate::modules::pricing::models::{Classification, Lane, ServiceRoute};
use crate::modules::pricing::services::ClassificationResolver;
use crate::modules::shipments::models::{
    BoxDetail, DeliveryAssignment, InvoiceRequest, InvoiceRequestCreated, NewInvoiceRequest,
    RequestStatus,
};
use crate::modules::shipments::repositories::InvoiceRequestRepository;

/// Payload scheduling a last-mile delivery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDeliveryAssignment {
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<NaiveDate>,
}

/// Registers invoice requests and their delivery assignments
pub struct ShipmentService {
    repo: Arc<dyn InvoiceRequestRepository>,
    identifiers: Arc<IdentifierGenerator>,
    classifier: ClassificationResolver,
}

impl ShipmentService {
    pub fn new(
        repo: Arc<dyn InvoiceRequestRepository>,
        identifiers: Arc<IdentifierGenerator>,
    ) -> Self {
        Self {
            repo,
            identifiers,
            classifier: ClassificationResolver::new(),
        }
    }

    /// Register a new invoice request.
    ///
    /// Issues the invoice number and tracking code before anything is stored;
    /// numbers burned by a later failure are never reissued.
    pub async fn create_request(&self, request: NewInvoiceRequest) -> Result<InvoiceRequestCreated> {
        let client_id = request.client_id.trim();
        if client_id.is_empty() {
            return Err(AppError::validation("client_id", "client_id is required"));
        }

        let route = ServiceRoute::parse(&request.service_route)?;
        let declared_value = request
            .declared_value
            .map(|v| ensure_non_negative("declared_value", v))
            .transpose()?;

        let (shipment_classification, boxes) = self.initial_classification(
            &route,
            request.shipment_classification,
            request.boxes,
        )?;

        let invoice_number = self.identifiers.next_invoice_number().await?;
        let tracking = self
            .identifiers
            .assign_tracking_code(&route, request.tracking_code.as_deref())
            .await?;

        let now = Utc::now();
        let created = InvoiceRequest {
            id: Uuid::new_v4().to_string(),
            invoice_number,
            tracking_code: tracking.tracking_code,
            client_id: client_id.to_string(),
            service_route: route,
            status: if request.submit {
                RequestStatus::Submitted
            } else {
                RequestStatus::Draft
            },
            sender_delivery_option: request.sender_delivery_option,
            insured: request.insured,
            declared_value,
            shipment_classification,
            boxes,
            verification: None,
            booking_id: request.booking_id.filter(|b| !b.trim().is_empty()),
            version: 1,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(&created).await?;

        info!(
            request_id = %created.id,
            invoice_number = %created.invoice_number,
            tracking_code = %created.tracking_code,
            route = %created.service_route,
            status = %created.status,
            "Invoice request registered"
        );

        Ok(InvoiceRequestCreated {
            request: created,
            tracking_code_substituted: tracking.substituted,
        })
    }

    pub async fn get_request(&self, id: &str) -> Result<InvoiceRequest> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("invoice request {}", id)))
    }

    pub async fn assign_delivery(
        &self,
        request_id: &str,
        payload: NewDeliveryAssignment,
    ) -> Result<DeliveryAssignment> {
        let request = self.get_request(request_id).await?;
        if request.is_cancelled() {
            return Err(AppError::conflict(format!(
                "invoice request {} is cancelled",
                request_id
            )));
        }

        let assignment = DeliveryAssignment {
            id: Uuid::new_v4().to_string(),
            request_id: request.id,
            driver_name: payload.driver_name,
            scheduled_for: payload.scheduled_for,
            status: "ASSIGNED".to_string(),
            created_at: Utc::now(),
        };
        self.repo.add_delivery_assignment(&assignment).await?;

        Ok(assignment)
    }

    /// Inbound requests may be registered before classification is known;
    /// the rule is then enforced at verification.
    fn initial_classification(
        &self,
        route: &ServiceRoute,
        shipment: Option<Classification>,
        mut boxes: Vec<BoxDetail>,
    ) -> Result<(Option<Classification>, Vec<BoxDetail>)> {
        if route.lane() == Lane::Inbound && shipment.is_none() {
            return Ok((None, boxes));
        }

        let box_classes: Vec<Option<Classification>> =
            boxes.iter().map(|b| b.classification.clone()).collect();
        let resolved = self
            .classifier
            .resolve(route, shipment.as_ref(), &box_classes)?;

        for (detail, class) in boxes.iter_mut().zip(resolved.boxes) {
            detail.classification = class;
        }
        Ok((resolved.shipment, boxes))
    }
}
