//! Portfolio statistics for the dashboard.

use crate::domain::loan::{Loan, LoanStatus, LoanType};
use crate::dto::dashboard::{LoanTypeSummary, PortfolioSummary};
use crate::repository::{LoanListQuery, LoanReader};
use crate::services::{ServiceError, ServiceResult};

fn summarize(loans: &[Loan]) -> PortfolioSummary {
    let count_status = |status: LoanStatus| loans.iter().filter(|l| l.status == status).count();

    let by_type = LoanType::ALL
        .into_iter()
        .map(|loan_type| {
            let of_type = loans.iter().filter(|l| l.loan_type == loan_type);
            LoanTypeSummary {
                loan_type,
                count: of_type.clone().count(),
                amount: of_type.map(|l| l.amount).sum(),
            }
        })
        .collect();

    PortfolioSummary {
        total: loans.len(),
        active: count_status(LoanStatus::Active),
        pending: count_status(LoanStatus::Pending),
        total_amount: loans.iter().map(|l| l.amount).sum(),
        by_type,
    }
}

/// Totals, counts per status and per product line across every loan.
pub fn portfolio_summary<R>(repo: &R) -> ServiceResult<PortfolioSummary>
where
    R: LoanReader + ?Sized,
{
    let (_total, loans) = repo.list_loans(LoanListQuery::new()).map_err(|err| {
        log::error!("Failed to load loans for the dashboard: {err}");
        ServiceError::from(err)
    })?;

    Ok(summarize(&loans))
}
