use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::verification::{BoxDetail, ShipmentVerification};
use crate::core::{AppError, Result};
use crate::modules::pricing::models::{
    CalculationInput, Classification, InvoiceOptions, SenderDeliveryOption, ServiceRoute,
};

/// Invoice request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Draft,
    Submitted,
    InProgress,
    Verified,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Draft => "DRAFT",
            RequestStatus::Submitted => "SUBMITTED",
            RequestStatus::InProgress => "IN_PROGRESS",
            RequestStatus::Verified => "VERIFIED",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Cancelled => "CANCELLED",
        }
    }

    /// Verification is accepted until the request is invoiced or cancelled
    pub fn accepts_verification(&self) -> bool {
        !matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(RequestStatus::Draft),
            "SUBMITTED" => Ok(RequestStatus::Submitted),
            "IN_PROGRESS" => Ok(RequestStatus::InProgress),
            "VERIFIED" => Ok(RequestStatus::Verified),
            "COMPLETED" => Ok(RequestStatus::Completed),
            "CANCELLED" => Ok(RequestStatus::Cancelled),
            other => Err(AppError::validation(
                "status",
                format!("unknown request status: {}", other),
            )),
        }
    }
}

/// A customer's shipment registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRequest {
    pub id: String,
    pub invoice_number: String,
    pub tracking_code: String,
    pub client_id: String,
    pub service_route: ServiceRoute,
    pub status: RequestStatus,
    pub sender_delivery_option: SenderDeliveryOption,
    pub insured: bool,
    pub declared_value: Option<Decimal>,
    pub shipment_classification: Option<Classification>,
    pub boxes: Vec<BoxDetail>,
    pub verification: Option<ShipmentVerification>,
    pub booking_id: Option<String>,
    /// Optimistic concurrency token, bumped on every write
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvoiceRequest {
    pub fn is_cancelled(&self) -> bool {
        self.status == RequestStatus::Cancelled
    }

    /// Build the engine input from the verified snapshot.
    ///
    /// Fails when operations has not verified the shipment yet.
    pub fn calculation_input(&self, options: InvoiceOptions) -> Result<CalculationInput> {
        let verification = self.verification.as_ref().ok_or_else(|| {
            AppError::validation(
                "verification",
                format!("invoice request {} has not been verified", self.id),
            )
        })?;

        Ok(CalculationInput {
            route: self.service_route.clone(),
            chargeable_weight: verification.chargeable_weight,
            number_of_boxes: verification.number_of_boxes,
            special_rate: verification.rate,
            flomic_or_personal: verification.flomic_or_personal,
            sender_delivery_option: self.sender_delivery_option,
            options,
        })
    }
}

/// Payload registering a new invoice request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInvoiceRequest {
    pub client_id: String,
    pub service_route: String,
    #[serde(default)]
    pub sender_delivery_option: SenderDeliveryOption,
    #[serde(default)]
    pub insured: bool,
    #[serde(default)]
    pub declared_value: Option<Decimal>,
    #[serde(default)]
    pub shipment_classification: Option<Classification>,
    #[serde(default)]
    pub boxes: Vec<BoxDetail>,
    /// Customer-supplied tracking code or AWB
    #[serde(default)]
    pub tracking_code: Option<String>,
    #[serde(default)]
    pub booking_id: Option<String>,
    /// Register straight into SUBMITTED instead of DRAFT
    #[serde(default)]
    pub submit: bool,
}

/// Response for a newly registered request
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRequestCreated {
    #[serde(flatten)]
    pub request: InvoiceRequest,
    /// Set when a supplied tracking code was replaced by a generated one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_code_substituted: Option<String>,
}
