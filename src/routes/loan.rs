use actix_web::{HttpResponse, Responder, get, post, put, web};
use serde::Deserialize;

use crate::domain::loan::{LoanStatus, LoanType};
use crate::dto::api::Page;
use crate::forms::loan::{LoanForm, LoanStatusForm, UpdateLoanForm};
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::loan::{self as loan_service, LoansQuery};

#[derive(Debug, Deserialize)]
pub struct LoansQueryParams {
    pub status: Option<LoanStatus>,
    #[serde(rename = "type")]
    pub loan_type: Option<LoanType>,
    pub client_id: Option<i32>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
}

#[get("/loans")]
pub async fn list_loans(
    params: web::Query<LoansQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = LoansQuery {
        status: params.status,
        loan_type: params.loan_type,
        client_id: params.client_id,
        page: params.page,
    };

    match loan_service::list_loans(repo.get_ref(), query) {
        Ok(response) => HttpResponse::Ok().json(Page::from(response)),
        Err(err) => service_error_response(err),
    }
}

#[post("/loans")]
pub async fn create_loan(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<LoanForm>,
) -> impl Responder {
    match loan_service::create_loan(repo.get_ref(), &form) {
        Ok(loan) => HttpResponse::Created().json(loan),
        Err(err) => service_error_response(err),
    }
}

#[get("/loans/{loan_id}")]
pub async fn show_loan(
    loan_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match loan_service::get_loan(repo.get_ref(), loan_id.into_inner()) {
        Ok(loan) => HttpResponse::Ok().json(loan),
        Err(err) => service_error_response(err),
    }
}

#[put("/loans/{loan_id}")]
pub async fn update_loan(
    loan_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<UpdateLoanForm>,
) -> impl Responder {
    match loan_service::update_loan(repo.get_ref(), loan_id.into_inner(), &form) {
        Ok(loan) => HttpResponse::Ok().json(loan),
        Err(err) => service_error_response(err),
    }
}

#[put("/loans/{loan_id}/status")]
pub async fn update_loan_status(
    loan_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<LoanStatusForm>,
) -> impl Responder {
    match loan_service::update_loan_status(repo.get_ref(), loan_id.into_inner(), &form) {
        Ok(loan) => HttpResponse::Ok().json(loan),
        Err(err) => service_error_response(err),
    }
}

#[get("/applications")]
pub async fn list_applications(
    params: web::Query<PageParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match loan_service::list_applications(repo.get_ref(), params.page) {
        Ok(response) => HttpResponse::Ok().json(Page::from(response)),
        Err(err) => service_error_response(err),
    }
}
