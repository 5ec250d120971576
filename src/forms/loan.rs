//! Forms for generic loan applications and loan review.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::loan::{LoanStatus, LoanType, NewLoan, UpdateLoan};
use crate::domain::types::ClientId;
use crate::forms::{FieldErrors, optional_text, validate_form};

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
/// Loan application entered directly, without the pawn wizard.
pub struct LoanForm {
    /// Borrower, checked against the client registry by the loan service.
    #[serde(default)]
    pub client_id: Option<i32>,
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    #[validate(range(min = 1.0, message = "Amount must be greater than 0"))]
    pub amount: f64,
    #[validate(range(min = 1, max = 60, message = "Term must be between 1 and 60 months"))]
    pub term: i32,
    #[validate(range(min = 0.0, max = 100.0, message = "Interest rate must be between 0 and 100"))]
    pub interest_rate: f64,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub collateral: Option<String>,
}

impl LoanForm {
    /// Validate and assemble a pending loan record for `client_id`.
    pub fn to_new_loan(&self, client_id: Option<ClientId>) -> Result<NewLoan, FieldErrors> {
        validate_form(self)?;
        Ok(NewLoan {
            client_id,
            loan_type: self.loan_type,
            amount: self.amount,
            status: LoanStatus::Pending,
            interest_rate: self.interest_rate,
            term: self.term,
            purpose: self.purpose.as_deref().and_then(optional_text),
            collateral: self.collateral.as_deref().and_then(optional_text),
            pawn: None,
            images: Vec::new(),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
/// Edits to the terms of a pending loan.
pub struct UpdateLoanForm {
    #[validate(range(min = 1.0, message = "Amount must be greater than 0"))]
    pub amount: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Interest rate must be between 0 and 100"))]
    pub interest_rate: f64,
    #[validate(range(min = 1, max = 60, message = "Term must be between 1 and 60 months"))]
    pub term: i32,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub collateral: Option<String>,
}

impl UpdateLoanForm {
    pub fn to_update_loan(&self) -> Result<UpdateLoan, FieldErrors> {
        validate_form(self)?;
        Ok(UpdateLoan {
            amount: self.amount,
            interest_rate: self.interest_rate,
            term: self.term,
            purpose: self.purpose.as_deref().and_then(optional_text),
            collateral: self.collateral.as_deref().and_then(optional_text),
        })
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
/// Approve, reject or otherwise move a loan through its workflow.
pub struct LoanStatusForm {
    pub status: LoanStatus,
}
