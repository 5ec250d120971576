use thiserror::Error;

use crate::forms::FieldErrors;
use crate::repository::errors::RepositoryError;
use crate::wizard::WizardStep;
use crate::wizard::images::ResourceError;

/// Everything a wizard handler can reject with. None of the variants discard
/// the session.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("{0}")]
    Validation(FieldErrors),

    #[error("the {expected} step is not active (currently on {current})")]
    WrongStep {
        expected: WizardStep,
        current: WizardStep,
    },

    #[error("no picture at position {index} ({len} attached)")]
    NoSuchImage { index: usize, len: usize },

    #[error("external service failed: {0}")]
    External(#[from] RepositoryError),

    #[error("image preview failed: {0}")]
    Resource(#[from] ResourceError),
}

impl From<FieldErrors> for WizardError {
    fn from(errors: FieldErrors) -> Self {
        WizardError::Validation(errors)
    }
}

impl WizardError {
    /// Messages to show the operator, one per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            WizardError::Validation(errors) => errors.messages(),
            WizardError::External(_) => {
                vec!["Could not reach the registry, please try again".to_string()]
            }
            other => vec![other.to_string()],
        }
    }

    /// Field-level errors, if this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            WizardError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type WizardResult<T> = Result<T, WizardError>;
