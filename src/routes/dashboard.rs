use actix_web::{HttpResponse, Responder, get, web};

use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::dashboard as dashboard_service;

#[get("/dashboard")]
pub async fn show_dashboard(repo: web::Data<DieselRepository>) -> impl Responder {
    match dashboard_service::portfolio_summary(repo.get_ref()) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => service_error_response(err),
    }
}
