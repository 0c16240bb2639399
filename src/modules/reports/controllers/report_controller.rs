use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::reports::services::ReportService;

/// GET /reports/cargo/{invoice_id}
pub async fn get_cargo_report(
    service: web::Data<Arc<ReportService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let report = service.get_for_invoice(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports").route("/cargo/{invoice_id}", web::get().to(get_cargo_report)),
    );
}
