use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Last-mile delivery assignment linked to an invoice request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DeliveryAssignment {
    pub id: String,
    pub request_id: String,
    pub driver_name: Option<String>,
    pub scheduled_for: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle event appended to a shipment booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEvent {
    pub booking_id: String,
    pub event: String,
    pub detail: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}
