//! Diesel models for loans and their stored photographs.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::loan::{
    Loan as DomainLoan, LoanImage as DomainLoanImage, NewLoan as DomainNewLoan, PawnDetails,
    UpdateLoan as DomainUpdateLoan,
};
use crate::domain::types::{ClientId, LoanId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::loans)]
/// Diesel model for [`crate::domain::loan::Loan`].
pub struct Loan {
    pub id: i32,
    pub client_id: Option<i32>,
    pub loan_type: String,
    pub amount: f64,
    pub status: String,
    pub interest_rate: f64,
    pub term: i32,
    pub purpose: Option<String>,
    pub collateral: Option<String>,
    pub pawn_details: Option<String>, // JSON text
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::loans)]
pub struct NewLoan<'a> {
    pub client_id: Option<i32>,
    pub loan_type: &'a str,
    pub amount: f64,
    pub status: &'a str,
    pub interest_rate: f64,
    pub term: i32,
    pub purpose: Option<&'a str>,
    pub collateral: Option<&'a str>,
    pub pawn_details: Option<String>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::loans)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateLoan<'a> {
    pub amount: f64,
    pub interest_rate: f64,
    pub term: i32,
    pub purpose: Option<&'a str>,
    pub collateral: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Loan, foreign_key = loan_id))]
#[diesel(table_name = crate::schema::loan_images)]
pub struct LoanImage {
    pub id: i32,
    pub loan_id: i32,
    pub position: i32,
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::loan_images)]
pub struct NewLoanImage<'a> {
    pub loan_id: i32,
    pub position: i32,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

impl<'a> TryFrom<&'a DomainNewLoan> for NewLoan<'a> {
    type Error = TypeConstraintError;

    fn try_from(loan: &'a DomainNewLoan) -> Result<Self, Self::Error> {
        let pawn_details = loan
            .pawn
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| TypeConstraintError::InvalidValue(e.to_string()))?;

        Ok(Self {
            client_id: loan.client_id.map(ClientId::get),
            loan_type: loan.loan_type.as_str(),
            amount: loan.amount,
            status: loan.status.as_str(),
            interest_rate: loan.interest_rate,
            term: loan.term,
            purpose: loan.purpose.as_deref(),
            collateral: loan.collateral.as_deref(),
            pawn_details,
        })
    }
}

impl<'a> UpdateLoan<'a> {
    pub fn new(loan: &'a DomainUpdateLoan, updated_at: NaiveDateTime) -> Self {
        Self {
            amount: loan.amount,
            interest_rate: loan.interest_rate,
            term: loan.term,
            purpose: loan.purpose.as_deref(),
            collateral: loan.collateral.as_deref(),
            updated_at,
        }
    }
}

impl From<LoanImage> for DomainLoanImage {
    fn from(image: LoanImage) -> Self {
        Self {
            file_name: image.file_name,
            content_type: image.content_type,
            data: image.data,
        }
    }
}

impl Loan {
    /// Builds the domain loan, attaching images already sorted by position.
    pub fn into_domain(self, images: Vec<LoanImage>) -> Result<DomainLoan, TypeConstraintError> {
        let pawn = self
            .pawn_details
            .as_deref()
            .map(serde_json::from_str::<PawnDetails>)
            .transpose()
            .map_err(|e| TypeConstraintError::InvalidValue(format!("pawn details: {e}")))?;

        Ok(DomainLoan {
            id: LoanId::try_from(self.id)?,
            client_id: self.client_id.map(ClientId::try_from).transpose()?,
            loan_type: self.loan_type.parse()?,
            amount: self.amount,
            status: self.status.parse()?,
            interest_rate: self.interest_rate,
            term: self.term,
            purpose: self.purpose,
            collateral: self.collateral,
            pawn,
            images: images.into_iter().map(Into::into).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
