//! Actix handlers for the JSON API.

use actix_web::HttpResponse;

use crate::dto::api::ApiError;
use crate::services::ServiceError;

pub mod client;
pub mod dashboard;
pub mod loan;
pub mod valuation;

/// Maps a service failure to a JSON error response.
pub fn service_error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(ApiError::new("Not found")),
        ServiceError::Validation(errors) => HttpResponse::UnprocessableEntity().json(ApiError {
            error: errors.to_string(),
            fields: errors.iter().cloned().collect(),
        }),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(ApiError::new(message))
        }
        ServiceError::Conflict(message) => HttpResponse::Conflict().json(ApiError::new(message)),
        ServiceError::Internal(message) => {
            log::error!("Internal error: {message}");
            HttpResponse::InternalServerError().json(ApiError::new("Internal server error"))
        }
    }
}
