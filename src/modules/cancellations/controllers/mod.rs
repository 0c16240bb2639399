use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::cancellations::models::CancelRequest;
use crate::modules::cancellations::services::CancellationService;

/// POST /invoice-requests/{id}/cancel
pub async fn cancel_request(
    service: web::Data<Arc<CancellationService>>,
    path: web::Path<String>,
    payload: Option<web::Json<CancelRequest>>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.map(web::Json::into_inner).unwrap_or_default();
    let record = service.cancel(&path.into_inner(), payload).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// GET /cancellations/{request_id}
pub async fn get_cancellation(
    service: web::Data<Arc<CancellationService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let record = service.find_record(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/invoice-requests/{id}/cancel").route(web::post().to(cancel_request)))
        .service(web::resource("/cancellations/{request_id}").route(web::get().to(get_cancellation)));
}
