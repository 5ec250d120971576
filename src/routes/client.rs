use actix_web::{HttpResponse, Responder, get, post, put, web};
use serde::Deserialize;

use crate::dto::api::Page;
use crate::forms::client::ClientForm;
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::client::{self as client_service, ClientsQuery};

#[derive(Debug, Deserialize)]
pub struct ClientsQueryParams {
    pub search: Option<String>,
    pub page: Option<usize>,
}

#[get("/clients")]
pub async fn list_clients(
    params: web::Query<ClientsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = params.into_inner();
    let query = ClientsQuery {
        search: params.search,
        page: params.page,
    };

    match client_service::list_clients(repo.get_ref(), query) {
        Ok(response) => HttpResponse::Ok().json(Page::from(response)),
        Err(err) => service_error_response(err),
    }
}

#[post("/clients")]
pub async fn create_client(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ClientForm>,
) -> impl Responder {
    match client_service::create_client(repo.get_ref(), &form) {
        Ok(client) => HttpResponse::Created().json(client),
        Err(err) => service_error_response(err),
    }
}

#[get("/clients/{client_id}")]
pub async fn show_client(
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match client_service::get_client(repo.get_ref(), client_id.into_inner()) {
        Ok(client) => HttpResponse::Ok().json(client),
        Err(err) => service_error_response(err),
    }
}

#[put("/clients/{client_id}")]
pub async fn update_client(
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<ClientForm>,
) -> impl Responder {
    match client_service::update_client(repo.get_ref(), client_id.into_inner(), &form) {
        Ok(client) => HttpResponse::Ok().json(client),
        Err(err) => service_error_response(err),
    }
}
