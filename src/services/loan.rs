//! Loan registry workflows: direct applications, review and edits.

use crate::domain::loan::{Loan, LoanStatus, LoanType};
use crate::domain::types::{ClientId, LoanId};
use crate::forms::FieldErrors;
use crate::forms::loan::{LoanForm, LoanStatusForm, UpdateLoanForm};
use crate::repository::{ClientReader, LoanListQuery, LoanReader, LoanWriter};
use crate::services::{DEFAULT_ITEMS_PER_PAGE, ServiceError, ServiceResult};

/// Filters accepted by the loan list.
#[derive(Debug, Default)]
pub struct LoansQuery {
    pub status: Option<LoanStatus>,
    pub loan_type: Option<LoanType>,
    pub client_id: Option<i32>,
    pub page: Option<usize>,
}

#[derive(Debug)]
pub struct LoansResponse {
    pub total: usize,
    pub page: usize,
    pub loans: Vec<Loan>,
}

pub fn list_loans<R>(repo: &R, params: LoansQuery) -> ServiceResult<LoansResponse>
where
    R: LoanReader + ?Sized,
{
    let page = params.page.unwrap_or(1).max(1);
    let mut query = LoanListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(status) = params.status {
        query = query.status(status);
    }
    if let Some(loan_type) = params.loan_type {
        query = query.loan_type(loan_type);
    }
    if let Some(client_id) = params.client_id {
        query = query.client(ClientId::new(client_id)?);
    }

    let (total, loans) = repo.list_loans(query).map_err(|err| {
        log::error!("Failed to list loans: {err}");
        ServiceError::from(err)
    })?;

    Ok(LoansResponse { total, page, loans })
}

/// Applications awaiting review, newest first.
pub fn list_applications<R>(repo: &R, page: Option<usize>) -> ServiceResult<LoansResponse>
where
    R: LoanReader + ?Sized,
{
    list_loans(
        repo,
        LoansQuery {
            status: Some(LoanStatus::Pending),
            page,
            ..LoansQuery::default()
        },
    )
}

pub fn get_loan<R>(repo: &R, loan_id: i32) -> ServiceResult<Loan>
where
    R: LoanReader + ?Sized,
{
    let loan_id = LoanId::new(loan_id)?;
    repo.get_loan_by_id(loan_id)?.ok_or(ServiceError::NotFound)
}

/// Registers a loan application entered directly. It starts as pending.
pub fn create_loan<R>(repo: &R, form: &LoanForm) -> ServiceResult<Loan>
where
    R: ClientReader + LoanWriter + ?Sized,
{
    let client_id = match form.client_id {
        Some(raw) => {
            let client_id = ClientId::new(raw)
                .map_err(|_| FieldErrors::single("client_id", "Unknown client"))?;
            if repo.get_client_by_id(client_id)?.is_none() {
                return Err(FieldErrors::single("client_id", "Unknown client").into());
            }
            Some(client_id)
        }
        None => None,
    };

    let new_loan = form.to_new_loan(client_id)?;

    let loan = repo.create_loan(&new_loan).map_err(|err| {
        log::error!("Failed to create loan: {err}");
        ServiceError::from(err)
    })?;

    log::info!("Loan {} ({}) created", loan.id, loan.loan_type);
    Ok(loan)
}

/// Edits the terms of a loan that is still pending review.
pub fn update_loan<R>(repo: &R, loan_id: i32, form: &UpdateLoanForm) -> ServiceResult<Loan>
where
    R: LoanReader + LoanWriter + ?Sized,
{
    let loan_id = LoanId::new(loan_id)?;
    let updates = form.to_update_loan()?;

    let current = repo.get_loan_by_id(loan_id)?.ok_or(ServiceError::NotFound)?;
    if current.status != LoanStatus::Pending {
        return Err(ServiceError::Conflict(format!(
            "only pending loans can be edited, loan {loan_id} is {}",
            current.status
        )));
    }

    repo.update_loan(loan_id, &updates).map_err(|err| {
        log::error!("Failed to update loan {loan_id}: {err}");
        ServiceError::from(err)
    })
}

/// Moves a loan through the review workflow.
pub fn update_loan_status<R>(repo: &R, loan_id: i32, form: &LoanStatusForm) -> ServiceResult<Loan>
where
    R: LoanReader + LoanWriter + ?Sized,
{
    let loan_id = LoanId::new(loan_id)?;

    let current = repo.get_loan_by_id(loan_id)?.ok_or(ServiceError::NotFound)?;
    if !current.status.can_transition_to(form.status) {
        return Err(ServiceError::Conflict(format!(
            "loan {loan_id} cannot move from {} to {}",
            current.status, form.status
        )));
    }

    let loan = repo
        .update_loan_status(loan_id, form.status)
        .map_err(|err| {
            log::error!("Failed to update status of loan {loan_id}: {err}");
            ServiceError::from(err)
        })?;

    log::info!("Loan {loan_id} is now {}", loan.status);
    Ok(loan)
}
