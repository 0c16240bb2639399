pub mod bulk_import_service;
pub mod invoice_service;

pub use bulk_import_service::{BulkImportService, ImportRow, ImportSummary, ImportedRow, RowError};
pub use invoice_service::InvoiceService;
