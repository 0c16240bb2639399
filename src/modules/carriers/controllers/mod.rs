use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::carriers::services::CarrierSyncService;

#[derive(Debug, Deserialize)]
pub struct RetryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Re-send unsynced invoices to the carrier
/// POST /carrier-sync/retry
pub async fn retry_pending(
    service: web::Data<Arc<CarrierSyncService>>,
    query: web::Query<RetryQuery>,
) -> Result<HttpResponse, AppError> {
    if query.limit < 1 {
        return Err(AppError::validation("limit", "limit must be at least 1"));
    }
    let summary = service.retry_pending(query.limit).await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// GET /carrier-sync/invoices/{invoice_id}
pub async fn get_sync_record(
    service: web::Data<Arc<CarrierSyncService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice_id = path.into_inner();
    let record = service
        .find_for_invoice(&invoice_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("carrier sync record for invoice {}", invoice_id)))?;

    Ok(HttpResponse::Ok().json(record))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/carrier-sync")
            .route("/retry", web::post().to(retry_pending))
            .route("/invoices/{invoice_id}", web::get().to(get_sync_record)),
    );
}
