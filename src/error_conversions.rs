//! Error conversion glue between the domain, form, repository and service
//! layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here instead of next to the types themselves.

use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        match val {
            FormError::Validation(errors) => ServiceError::Validation(errors),
            other => ServiceError::Form(other.to_string()),
        }
    }
}
