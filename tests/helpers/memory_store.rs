// In-memory implementations of every repository seam
//
// One shared MemoryState backs all repositories so a test can observe the
// effect of one service on another (an invoice completing its request, a
// cancellation removing both). Cancellation units work on a cloned copy and
// only publish it on commit, mirroring a database transaction.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use freightbill::core::{AppError, Result};
use freightbill::modules::cancellations::{CancellationRecord, CancellationStore, CancellationUnit};
use freightbill::modules::carriers::{CarrierSyncRecord, CarrierSyncRepository, SyncStatus};
use freightbill::modules::identifiers::{IdentifierKind, IdentifierRegistry};
use freightbill::modules::invoices::{Invoice, InvoiceRepository};
use freightbill::modules::reports::{CargoReport, ReportRepository};
use freightbill::modules::shipments::models::{BookingEvent, DeliveryAssignment};
use freightbill::modules::shipments::{
    InvoiceRequest, InvoiceRequestRepository, RequestStatus, ShipmentVerification,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub requests: HashMap<String, InvoiceRequest>,
    pub invoices: HashMap<String, Invoice>,
    pub assignments: Vec<DeliveryAssignment>,
    pub identifiers: HashSet<(IdentifierKind, String)>,
    pub cancellations: HashMap<String, CancellationRecord>,
    pub bookings: HashSet<String>,
    pub booking_events: Vec<BookingEvent>,
    pub sync_records: HashMap<String, CarrierSyncRecord>,
    pub reports: Vec<CargoReport>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_delete_request: Arc<AtomicBool>,
    fail_reports: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap()
    }

    pub fn add_booking(&self, booking_id: &str) {
        self.state().bookings.insert(booking_id.to_string());
    }

    pub fn reserve(&self, kind: IdentifierKind, value: &str) {
        self.state().identifiers.insert((kind, value.to_string()));
    }

    /// Make the request delete step of a cancellation fail
    pub fn fail_delete_request(&self, fail: bool) {
        self.fail_delete_request.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reports(&self, fail: bool) {
        self.fail_reports.store(fail, Ordering::SeqCst);
    }

    fn invoice_for_request(state: &MemoryState, request_id: &str) -> Option<Invoice> {
        state
            .invoices
            .values()
            .find(|invoice| invoice.request_id == request_id)
            .cloned()
    }
}

#[async_trait]
impl InvoiceRequestRepository for MemoryStore {
    async fn create(&self, request: &InvoiceRequest) -> Result<()> {
        let mut state = self.state();
        let duplicate = state.requests.values().any(|existing| {
            existing.invoice_number == request.invoice_number
                || existing.tracking_code == request.tracking_code
        });
        if duplicate {
            return Err(AppError::conflict("duplicate invoice number or tracking code"));
        }
        state.requests.insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InvoiceRequest>> {
        Ok(self.state().requests.get(id).cloned())
    }

    async fn save_verification(
        &self,
        id: &str,
        verification: &ShipmentVerification,
        expected_version: i64,
    ) -> Result<InvoiceRequest> {
        let mut state = self.state();
        let request = state
            .requests
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("invoice request {}", id)))?;

        if request.version != expected_version || !request.status.accepts_verification() {
            return Err(AppError::conflict(format!(
                "invoice request {} changed since version {}",
                id, expected_version
            )));
        }

        request.verification = Some(verification.clone());
        request.declared_value = verification.declared_value;
        request.shipment_classification = verification.shipment_classification.clone();
        request.boxes = verification.boxes.clone();
        request.status = RequestStatus::Verified;
        request.version += 1;
        request.updated_at = Utc::now();

        Ok(request.clone())
    }

    async fn add_delivery_assignment(&self, assignment: &DeliveryAssignment) -> Result<()> {
        self.state().assignments.push(assignment.clone());
        Ok(())
    }

    async fn find_delivery_assignments(&self, request_id: &str) -> Result<Vec<DeliveryAssignment>> {
        Ok(self
            .state()
            .assignments
            .iter()
            .filter(|a| a.request_id == request_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InvoiceRepository for MemoryStore {
    async fn create_for_request(&self, invoice: &Invoice, expected_version: i64) -> Result<()> {
        let mut state = self.state();
        if Self::invoice_for_request(&state, &invoice.request_id).is_some() {
            return Err(AppError::conflict(format!(
                "invoice request {} already has an invoice",
                invoice.request_id
            )));
        }

        let request = state
            .requests
            .get_mut(&invoice.request_id)
            .filter(|r| {
                r.version == expected_version
                    && !matches!(r.status, RequestStatus::Completed | RequestStatus::Cancelled)
            })
            .ok_or_else(|| {
                AppError::conflict(format!(
                    "invoice request {} changed since version {}",
                    invoice.request_id, expected_version
                ))
            })?;
        request.status = RequestStatus::Completed;
        request.version += 1;

        state.invoices.insert(invoice.id.clone(), invoice.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        Ok(self.state().invoices.get(id).cloned())
    }

    async fn find_by_request_id(&self, request_id: &str) -> Result<Option<Invoice>> {
        Ok(Self::invoice_for_request(&self.state(), request_id))
    }
}

#[async_trait]
impl IdentifierRegistry for MemoryStore {
    async fn reserve(&self, kind: IdentifierKind, value: &str) -> Result<bool> {
        Ok(self.state().identifiers.insert((kind, value.to_string())))
    }
}

#[async_trait]
impl CarrierSyncRepository for MemoryStore {
    async fn save(&self, record: &CarrierSyncRecord) -> Result<()> {
        self.state()
            .sync_records
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn find_by_invoice_id(&self, invoice_id: &str) -> Result<Option<CarrierSyncRecord>> {
        Ok(self
            .state()
            .sync_records
            .values()
            .find(|r| r.invoice_id == invoice_id)
            .cloned())
    }

    async fn find_unsynced(&self, limit: i64) -> Result<Vec<CarrierSyncRecord>> {
        let mut records: Vec<CarrierSyncRecord> = self
            .state()
            .sync_records
            .values()
            .filter(|r| r.status != SyncStatus::Synced)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.created_at);
        records.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(records)
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn save(&self, report: &CargoReport) -> std::result::Result<(), AppError> {
        if self.fail_reports.load(Ordering::SeqCst) {
            return Err(AppError::internal("report storage unavailable"));
        }
        self.state().reports.push(report.clone());
        Ok(())
    }

    async fn find_by_invoice_id(
        &self,
        invoice_id: &str,
    ) -> std::result::Result<Option<CargoReport>, AppError> {
        Ok(self
            .state()
            .reports
            .iter()
            .find(|r| r.invoice_id == invoice_id)
            .cloned())
    }
}

#[async_trait]
impl CancellationStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn CancellationUnit>> {
        let working = self.state().clone();
        Ok(Box::new(MemoryCancellationUnit {
            shared: self.state.clone(),
            working,
            fail_delete_request: self.fail_delete_request.load(Ordering::SeqCst),
        }))
    }

    async fn find_record(&self, request_id: &str) -> Result<Option<CancellationRecord>> {
        Ok(self.state().cancellations.get(request_id).cloned())
    }
}

pub struct MemoryCancellationUnit {
    shared: Arc<Mutex<MemoryState>>,
    working: MemoryState,
    fail_delete_request: bool,
}

#[async_trait]
impl CancellationUnit for MemoryCancellationUnit {
    async fn lock_request(&mut self, request_id: &str) -> Result<Option<InvoiceRequest>> {
        Ok(self.working.requests.get(request_id).cloned())
    }

    async fn has_record(&mut self, request_id: &str) -> Result<bool> {
        Ok(self.working.cancellations.contains_key(request_id))
    }

    async fn find_invoice(&mut self, request_id: &str) -> Result<Option<Invoice>> {
        Ok(MemoryStore::invoice_for_request(&self.working, request_id))
    }

    async fn find_assignments(&mut self, request_id: &str) -> Result<Vec<DeliveryAssignment>> {
        Ok(self
            .working
            .assignments
            .iter()
            .filter(|a| a.request_id == request_id)
            .cloned()
            .collect())
    }

    async fn insert_record(&mut self, record: &CancellationRecord) -> Result<()> {
        if self.working.cancellations.contains_key(&record.request_id) {
            return Err(AppError::conflict("cancellation record already exists"));
        }
        self.working
            .cancellations
            .insert(record.request_id.clone(), record.clone());
        Ok(())
    }

    async fn delete_invoice(&mut self, request_id: &str) -> Result<()> {
        self.working
            .invoices
            .retain(|_, invoice| invoice.request_id != request_id);
        Ok(())
    }

    async fn delete_assignments(&mut self, request_id: &str) -> Result<()> {
        self.working.assignments.retain(|a| a.request_id != request_id);
        Ok(())
    }

    async fn delete_request(&mut self, request_id: &str) -> Result<()> {
        if self.fail_delete_request {
            return Err(AppError::internal("injected delete failure"));
        }
        match self.working.requests.remove(request_id) {
            Some(_) => Ok(()),
            None => Err(AppError::internal(format!(
                "invoice request {} vanished during cancellation",
                request_id
            ))),
        }
    }

    async fn append_booking_event(&mut self, event: &BookingEvent) -> Result<bool> {
        if !self.working.bookings.contains(&event.booking_id) {
            return Ok(false);
        }
        self.working.booking_events.push(event.clone());
        Ok(true)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryCancellationUnit { shared, working, .. } = *self;
        *shared.lock().unwrap() = working;
        Ok(())
    }
}
