use actix_web::{HttpResponse, Responder, get, web};

use crate::routes::service_error_response;
use crate::services::valuation as valuation_service;
use crate::wizard::back_office::PawnBackOffice;

#[get("/valuation")]
pub async fn show_valuation(back_office: web::Data<PawnBackOffice>) -> impl Responder {
    match valuation_service::valuation_overview(back_office.get_ref()) {
        Ok(overview) => HttpResponse::Ok().json(overview),
        Err(err) => service_error_response(err),
    }
}
