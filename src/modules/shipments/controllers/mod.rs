use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::shipments::models::{NewInvoiceRequest, VerificationRequest};
use crate::modules::shipments::services::{
    NewDeliveryAssignment, ShipmentService, VerificationService,
};

/// Register a shipment
/// POST /invoice-requests
pub async fn create_request(
    service: web::Data<Arc<ShipmentService>>,
    request: web::Json<NewInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let created = service.create_request(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /invoice-requests/{id}
pub async fn get_request(
    service: web::Data<Arc<ShipmentService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let request = service.get_request(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

/// Operations' verification update
/// PUT /invoice-requests/{id}/verification
pub async fn apply_verification(
    service: web::Data<Arc<VerificationService>>,
    path: web::Path<String>,
    payload: web::Json<VerificationRequest>,
) -> Result<HttpResponse, AppError> {
    let updated = service
        .apply_verification(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// POST /invoice-requests/{id}/delivery-assignments
pub async fn assign_delivery(
    service: web::Data<Arc<ShipmentService>>,
    path: web::Path<String>,
    payload: web::Json<NewDeliveryAssignment>,
) -> Result<HttpResponse, AppError> {
    let assignment = service
        .assign_delivery(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(assignment))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/invoice-requests").route(web::post().to(create_request)))
        .service(web::resource("/invoice-requests/{id}").route(web::get().to(get_request)))
        .service(
            web::resource("/invoice-requests/{id}/verification")
                .route(web::put().to(apply_verification)),
        )
        .service(
            web::resource("/invoice-requests/{id}/delivery-assignments")
                .route(web::post().to(assign_delivery)),
        );
}
