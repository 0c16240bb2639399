// Request builders and a fully wired in-memory application

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use freightbill::app::{AppServices, Repositories};
use freightbill::config::PricingConfig;
use freightbill::modules::identifiers::{CandidateSource, IdentifierGenerator, RandomCandidates};
use freightbill::modules::invoices::GenerateInvoiceRequest;
use freightbill::modules::pricing::{BracketRateTable, Classification, SenderDeliveryOption};
use freightbill::modules::shipments::{NewInvoiceRequest, VerificationRequest};

use super::fakes::FakeCarrier;
use super::memory_store::MemoryStore;

pub const RATE_TABLE_YAML: &str = r#"
lanes:
  outbound:
    - { min_kg: "0", rate_per_kg: "10.00" }
  inbound:
    - { min_kg: "0", rate_per_kg: "12.00" }
  other:
    - { min_kg: "0", max_kg: "50", rate_per_kg: "15.00" }
    - { min_kg: "50", rate_per_kg: "13.50" }
"#;

pub fn rate_table() -> BracketRateTable {
    BracketRateTable::from_yaml(RATE_TABLE_YAML).unwrap()
}

pub struct TestApp {
    pub store: MemoryStore,
    pub carrier: Arc<FakeCarrier>,
    pub services: AppServices,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(PricingConfig::default(), FakeCarrier::new(), Arc::new(RandomCandidates))
    }

    pub fn with_carrier(carrier: FakeCarrier) -> Self {
        Self::build(PricingConfig::default(), carrier, Arc::new(RandomCandidates))
    }

    pub fn with_config(config: PricingConfig) -> Self {
        Self::build(config, FakeCarrier::new(), Arc::new(RandomCandidates))
    }

    pub fn build(
        config: PricingConfig,
        carrier: FakeCarrier,
        candidates: Arc<dyn CandidateSource>,
    ) -> Self {
        let store = MemoryStore::new();
        let carrier = Arc::new(carrier);
        let repos = Repositories {
            requests: Arc::new(store.clone()),
            invoices: Arc::new(store.clone()),
            identifiers: Arc::new(store.clone()),
            cancellations: Arc::new(store.clone()),
            carrier_sync: Arc::new(store.clone()),
            reports: Arc::new(store.clone()),
        };
        let identifiers = Arc::new(IdentifierGenerator::with_candidates(
            repos.identifiers.clone(),
            candidates,
            &config,
        ));
        let services = AppServices::with_identifiers(
            &config,
            Arc::new(rate_table()),
            carrier.clone(),
            repos,
            identifiers,
        );

        Self {
            store,
            carrier,
            services,
        }
    }
}

pub fn outbound_request() -> NewInvoiceRequest {
    NewInvoiceRequest {
        client_id: "CLIENT-001".to_string(),
        service_route: "ph to uae".to_string(),
        sender_delivery_option: SenderDeliveryOption::Pickup,
        submit: true,
        ..NewInvoiceRequest::default()
    }
}

pub fn inbound_request(classification: Option<Classification>) -> NewInvoiceRequest {
    NewInvoiceRequest {
        client_id: "CLIENT-002".to_string(),
        service_route: "UAE-TO-PH".to_string(),
        shipment_classification: classification,
        submit: true,
        ..NewInvoiceRequest::default()
    }
}

pub fn verification(actual: Decimal, volumetric: Decimal, boxes: u32) -> VerificationRequest {
    VerificationRequest {
        expected_version: Some(1),
        actual_weight: Some(actual),
        volumetric_weight: Some(volumetric),
        number_of_boxes: Some(boxes),
        verified_by: Some("ops-1".to_string()),
        ..VerificationRequest::default()
    }
}

/// Outbound tax-invoice settlement with a pickup amount
pub fn tax_invoice_options() -> GenerateInvoiceRequest {
    GenerateInvoiceRequest {
        tax_rate: Some(dec!(5)),
        pickup_base_amount: Some(dec!(15)),
        ..GenerateInvoiceRequest::default()
    }
}
