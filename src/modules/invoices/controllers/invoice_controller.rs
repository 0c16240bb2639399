use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::invoices::models::GenerateInvoiceRequest;
use crate::modules::invoices::services::{BulkImportService, ImportRow, InvoiceService};
use crate::modules::pricing::models::CalculationInput;

/// Generate the invoice for a verified request
/// POST /invoice-requests/{id}/invoice
pub async fn generate_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
    request: web::Json<GenerateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .generate_invoice(&path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(invoice))
}

/// GET /invoice-requests/{id}/invoice
pub async fn get_invoice_for_request(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.get_invoice_for_request(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// GET /invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.get_invoice(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(invoice))
}

/// Price a shipment without storing anything
/// POST /quotes
pub async fn quote(
    service: web::Data<Arc<InvoiceService>>,
    input: web::Json<CalculationInput>,
) -> Result<HttpResponse, AppError> {
    let calculation = service.quote(&input)?;
    Ok(HttpResponse::Ok().json(calculation))
}

/// POST /imports/invoices
pub async fn import_invoices(
    service: web::Data<Arc<BulkImportService>>,
    rows: web::Json<Vec<ImportRow>>,
) -> Result<HttpResponse, AppError> {
    let summary = service.import_rows(rows.into_inner()).await;
    Ok(HttpResponse::Ok().json(summary))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/invoice-requests/{id}/invoice")
            .route(web::post().to(generate_invoice))
            .route(web::get().to(get_invoice_for_request)),
    )
    .service(web::resource("/invoices/{id}").route(web::get().to(get_invoice)))
    .service(web::resource("/quotes").route(web::post().to(quote)))
    .service(web::resource("/imports/invoices").route(web::post().to(import_invoices)));
}
