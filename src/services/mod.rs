//! Application services shared by the HTTP handlers.
//!
//! Services are free functions generic over the repository traits they need,
//! so handlers pass the Diesel repository and tests pass fakes or mocks.

use thiserror::Error;

use crate::forms::FieldErrors;
use crate::repository::errors::RepositoryError;

pub mod client;
pub mod dashboard;
pub mod loan;
pub mod valuation;

/// Page size used by list endpoints.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}
