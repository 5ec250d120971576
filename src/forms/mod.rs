//! Form definitions backing the wizard steps and the JSON API.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

pub mod client;
pub mod loan;
pub mod pawn;

/// A single failed field with a message fit for display next to it.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every field that failed validation in one submission attempt.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Returns `true` when `field` has at least one error.
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(|error| error.message.clone()).collect()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self.messages();
        write!(f, "{}", messages.join("; "))
    }
}

/// Turns `item_details` into `Item details`.
fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut collected = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            let field = field.to_string();
            for error in field_errors.iter() {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None if error.code == "required" => format!("{} is required", humanize(&field)),
                    None => format!("{} is invalid", humanize(&field)),
                };
                collected.push(FieldError::new(field.clone(), message));
            }
        }
        collected.sort_by(|a, b| a.field.cmp(&b.field));
        Self(collected)
    }
}

/// Runs the derived validation rules of `form`.
pub fn validate_form<F: Validate>(form: &F) -> Result<(), FieldErrors> {
    form.validate().map_err(FieldErrors::from)
}

/// Rejects strings that are empty after trimming.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}

/// Trimmed optional text, `None` when blank.
pub(crate) fn optional_text(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|s| !s.is_empty())
}

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] FieldErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid address")]
    InvalidAddress,

    #[error("invalid text")]
    InvalidText,
}

impl std::error::Error for FieldErrors {}

impl From<FormError> for FieldErrors {
    fn from(error: FormError) -> Self {
        let field = match &error {
            FormError::Validation(errors) => return errors.clone(),
            FormError::InvalidEmail => "email",
            FormError::InvalidName => "name",
            FormError::InvalidPhoneNumber => "phone",
            FormError::InvalidAddress => "address",
            FormError::InvalidText => "text",
        };
        let message = humanize(&error.to_string());
        FieldErrors::single(field, message)
    }
}
