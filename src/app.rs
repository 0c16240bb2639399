// Service wiring shared by the binary and the HTTP tests

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::config::PricingConfig;
use crate::modules::cancellations::{CancellationService, CancellationStore, MySqlCancellationStore};
use crate::modules::carriers::{
    CarrierClient, CarrierSyncRepository, CarrierSyncService, MySqlCarrierSyncRepository,
};
use crate::modules::identifiers::{IdentifierGenerator, IdentifierRegistry, MySqlIdentifierRegistry};
use crate::modules::invoices::{
    BulkImportService, InvoiceRepository, InvoiceService, MySqlInvoiceRepository,
};
use crate::modules::pricing::{InvoiceEngine, RateTable};
use crate::modules::reports::{MySqlReportRepository, ReportRepository, ReportService};
use crate::modules::shipments::{
    InvoiceRequestRepository, MySqlInvoiceRequestRepository, ShipmentService, VerificationService,
};
use crate::modules::{cancellations, carriers, health, invoices, reports, shipments};

/// Every storage seam the services depend on
#[derive(Clone)]
pub struct Repositories {
    pub requests: Arc<dyn InvoiceRequestRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub identifiers: Arc<dyn IdentifierRegistry>,
    pub cancellations: Arc<dyn CancellationStore>,
    pub carrier_sync: Arc<dyn CarrierSyncRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

impl Repositories {
    pub fn mysql(pool: MySqlPool) -> Self {
        Self {
            requests: Arc::new(MySqlInvoiceRequestRepository::new(pool.clone())),
            invoices: Arc::new(MySqlInvoiceRepository::new(pool.clone())),
            identifiers: Arc::new(MySqlIdentifierRegistry::new(pool.clone())),
            cancellations: Arc::new(MySqlCancellationStore::new(pool.clone())),
            carrier_sync: Arc::new(MySqlCarrierSyncRepository::new(pool.clone())),
            reports: Arc::new(MySqlReportRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub shipments: Arc<ShipmentService>,
    pub verification: Arc<VerificationService>,
    pub invoices: Arc<InvoiceService>,
    pub bulk_import: Arc<BulkImportService>,
    pub cancellations: Arc<CancellationService>,
    pub carrier_sync: Arc<CarrierSyncService>,
    pub reports: Arc<ReportService>,
}

impl AppServices {
    pub fn build(
        pricing: &PricingConfig,
        rate_table: Arc<dyn RateTable>,
        carrier: Arc<dyn CarrierClient>,
        repos: Repositories,
    ) -> Self {
        let identifiers = Arc::new(IdentifierGenerator::new(repos.identifiers.clone(), pricing));
        Self::with_identifiers(pricing, rate_table, carrier, repos, identifiers)
    }

    pub fn with_identifiers(
        pricing: &PricingConfig,
        rate_table: Arc<dyn RateTable>,
        carrier: Arc<dyn CarrierClient>,
        repos: Repositories,
        identifiers: Arc<IdentifierGenerator>,
    ) -> Self {
        let engine = Arc::new(InvoiceEngine::new(pricing, rate_table));
        let carrier_sync = Arc::new(CarrierSyncService::new(carrier, repos.carrier_sync.clone()));
        let reports = Arc::new(ReportService::new(repos.reports.clone()));

        let shipments = Arc::new(ShipmentService::new(repos.requests.clone(), identifiers));
        let verification = Arc::new(VerificationService::new(repos.requests.clone()));
        let invoices = Arc::new(InvoiceService::new(
            repos.requests.clone(),
            repos.invoices.clone(),
            engine,
            carrier_sync.clone(),
            reports.clone(),
            pricing.billing_currency,
        ));
        let bulk_import = Arc::new(BulkImportService::new(
            shipments.clone(),
            verification.clone(),
            invoices.clone(),
        ));
        let cancellations = Arc::new(CancellationService::new(repos.cancellations.clone()));

        Self {
            shipments,
            verification,
            invoices,
            bulk_import,
            cancellations,
            carrier_sync,
            reports,
        }
    }

    /// Register service handles and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.shipments.clone()))
            .app_data(web::Data::new(self.verification.clone()))
            .app_data(web::Data::new(self.invoices.clone()))
            .app_data(web::Data::new(self.bulk_import.clone()))
            .app_data(web::Data::new(self.cancellations.clone()))
            .app_data(web::Data::new(self.carrier_sync.clone()))
            .app_data(web::Data::new(self.reports.clone()))
            .app_data(crate::middleware::json_config())
            .configure(health::configure)
            .configure(shipments::controllers::configure)
            .configure(invoices::controllers::configure)
            .configure(cancellations::controllers::configure)
            .configure(carriers::controllers::configure)
            .configure(reports::controllers::configure);
    }
}
