use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::invoices::models::Invoice;
use crate::modules::shipments::models::{DeliveryAssignment, InvoiceRequest};

/// ACTIVE -> CANCELLING -> CANCELLED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CancellationState {
    Active,
    Cancelling,
    Cancelled,
}

impl CancellationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CancellationState::Active => "ACTIVE",
            CancellationState::Cancelling => "CANCELLING",
            CancellationState::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for CancellationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable audit record written before anything is deleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationRecord {
    pub id: String,
    pub request_id: String,
    pub invoice_number: String,
    pub tracking_code: String,
    pub state: CancellationState,
    pub reason: Option<String>,
    pub cancelled_by: Option<String>,
    pub request: InvoiceRequest,
    pub invoice: Option<Invoice>,
    pub assignments: Vec<DeliveryAssignment>,
    pub cancelled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelRequest {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub cancelled_by: Option<String>,
}
