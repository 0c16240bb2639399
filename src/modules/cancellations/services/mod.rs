use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::cancellations::models::{CancelRequest, CancellationRecord, CancellationState};
use crate::modules::cancellations::repositories::{CancellationStore, CancellationUnit};
use crate::modules::shipments::models::BookingEvent;

/// Archives and removes an invoice request together with its invoice and
/// delivery assignments
pub struct CancellationService {
    store: Arc<dyn CancellationStore>,
}

impl CancellationService {
    pub fn new(store: Arc<dyn CancellationStore>) -> Self {
        Self { store }
    }

    /// Cancel a request atomically.
    ///
    /// The audit record is written first; any failing step rolls back the
    /// whole unit, the audit record included.
    pub async fn cancel(&self, request_id: &str, payload: CancelRequest) -> Result<CancellationRecord> {
        let unit = self.store.begin().await?;

        match self.cancel_in_unit(unit, request_id, payload).await {
            Ok(record) => {
                info!(
                    request_id = %request_id,
                    from = %CancellationState::Cancelling,
                    to = %CancellationState::Cancelled,
                    "Cancellation committed"
                );
                Ok(record)
            }
            Err(err) => {
                warn!(request_id = %request_id, error = %err, "Cancellation rolled back");
                Err(err)
            }
        }
    }

    pub async fn find_record(&self, request_id: &str) -> Result<CancellationRecord> {
        self.store
            .find_record(request_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("cancellation of request {}", request_id)))
    }

    async fn cancel_in_unit(
        &self,
        mut unit: Box<dyn CancellationUnit>,
        request_id: &str,
        payload: CancelRequest,
    ) -> Result<CancellationRecord> {
        let request = match unit.lock_request(request_id).await? {
            Some(request) if !request.is_cancelled() => request,
            Some(_) => {
                return Err(AppError::conflict(format!(
                    "invoice request {} is already cancelled",
                    request_id
                )))
            }
            None if unit.has_record(request_id).await? => {
                return Err(AppError::conflict(format!(
                    "invoice request {} is already cancelled",
                    request_id
                )))
            }
            None => {
                return Err(AppError::not_found(format!("invoice request {}", request_id)))
            }
        };

        info!(
            request_id = %request.id,
            from = %CancellationState::Active,
            to = %CancellationState::Cancelling,
            "Cancelling invoice request"
        );

        let invoice = unit.find_invoice(&request.id).await?;
        let assignments = unit.find_assignments(&request.id).await?;
        let record = CancellationRecord {
            id: Uuid::new_v4().to_string(),
            request_id: request.id.clone(),
            invoice_number: request.invoice_number.clone(),
            tracking_code: request.tracking_code.clone(),
            state: CancellationState::Cancelled,
            reason: payload.reason,
            cancelled_by: payload.cancelled_by,
            request,
            invoice,
            assignments,
            cancelled_at: Utc::now(),
        };

        unit.insert_record(&record).await?;
        unit.delete_invoice(&record.request_id).await?;
        unit.delete_assignments(&record.request_id).await?;
        unit.delete_request(&record.request_id).await?;

        if let Some(booking_id) = record.request.booking_id.as_deref() {
            let event = BookingEvent {
                booking_id: booking_id.to_string(),
                event: "INVOICE_REQUEST_CANCELLED".to_string(),
                detail: serde_json::json!({
                    "request_id": record.request_id,
                    "invoice_number": record.invoice_number,
                    "reason": record.reason,
                }),
                occurred_at: record.cancelled_at,
            };
            if !unit.append_booking_event(&event).await? {
                warn!(booking_id = %booking_id, "Booking not found; no lifecycle event appended");
            }
        }

        unit.commit().await?;
        Ok(record)
    }
}
