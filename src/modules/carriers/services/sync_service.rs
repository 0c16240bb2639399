use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::carrier_client::CarrierClient;
use crate::core::Result;
use crate::modules::carriers::models::{
    CarrierShipmentPayload, CarrierSyncRecord, RetrySummary, SyncStatus,
};
use crate::modules::carriers::repositories::CarrierSyncRepository;
use crate::modules::invoices::models::Invoice;
use crate::modules::shipments::models::InvoiceRequest;

/// Pushes issued invoices to the carrier and keeps an outbox of attempts.
///
/// A carrier failure is recorded on the sync record, never returned to the
/// caller; only outbox persistence errors propagate.
pub struct CarrierSyncService {
    client: Arc<dyn CarrierClient>,
    repo: Arc<dyn CarrierSyncRepository>,
}

impl CarrierSyncService {
    pub fn new(client: Arc<dyn CarrierClient>, repo: Arc<dyn CarrierSyncRepository>) -> Self {
        Self { client, repo }
    }

    pub async fn sync_invoice(
        &self,
        request: &InvoiceRequest,
        invoice: &Invoice,
    ) -> Result<CarrierSyncRecord> {
        let payload = CarrierShipmentPayload::build(request, invoice);
        let now = Utc::now();
        let mut record = CarrierSyncRecord {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice.id.clone(),
            request_id: request.id.clone(),
            status: SyncStatus::Pending,
            attempts: 0,
            last_error: None,
            carrier_reference: None,
            payload: serde_json::to_value(&payload)?,
            created_at: now,
            updated_at: now,
        };
        self.repo.save(&record).await?;

        self.attempt(&mut record, &payload).await;
        self.repo.save(&record).await?;

        Ok(record)
    }

    /// Re-send PENDING and FAILED records
    pub async fn retry_pending(&self, limit: i64) -> Result<RetrySummary> {
        let records = self.repo.find_unsynced(limit).await?;
        let mut summary = RetrySummary::default();

        for mut record in records {
            let payload: CarrierShipmentPayload = serde_json::from_value(record.payload.clone())?;
            summary.attempted += 1;

            self.attempt(&mut record, &payload).await;
            self.repo.save(&record).await?;

            match record.status {
                SyncStatus::Synced => summary.synced += 1,
                _ => summary.failed += 1,
            }
        }

        info!(
            attempted = summary.attempted,
            synced = summary.synced,
            failed = summary.failed,
            "Carrier sync retry finished"
        );

        Ok(summary)
    }

    pub async fn find_for_invoice(&self, invoice_id: &str) -> Result<Option<CarrierSyncRecord>> {
        self.repo.find_by_invoice_id(invoice_id).await
    }

    async fn attempt(&self, record: &mut CarrierSyncRecord, payload: &CarrierShipmentPayload) {
        match self.client.create_shipment(payload).await {
            Ok(receipt) => {
                info!(
                    invoice_id = %record.invoice_id,
                    carrier = self.client.name(),
                    reference = %receipt.reference,
                    "Invoice synced to carrier"
                );
                record.mark_synced(receipt.reference);
            }
            Err(err) => {
                warn!(
                    invoice_id = %record.invoice_id,
                    carrier = self.client.name(),
                    attempts = record.attempts + 1,
                    error = %err,
                    "Carrier sync failed; kept for retry"
                );
                record.mark_failed(err.to_string());
            }
        }
    }
}
