//! Dashboard statistics.

use serde::Serialize;

use crate::domain::loan::LoanType;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoanTypeSummary {
    #[serde(rename = "type")]
    pub loan_type: LoanType,
    pub count: usize,
    pub amount: f64,
}

/// Portfolio totals, with one entry per loan type in [`LoanType::ALL`] order.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PortfolioSummary {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub total_amount: f64,
    pub by_type: Vec<LoanTypeSummary>,
}
