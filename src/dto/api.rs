//! DTOs exposed by the JSON API endpoints.

use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::loan::Loan;
use crate::domain::valuation::ValuationItem;
use crate::forms::FieldError;
use crate::services::DEFAULT_ITEMS_PER_PAGE;
use crate::services::client::ClientsResponse;
use crate::services::loan::LoansResponse;

/// One page of a list endpoint.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// Number of matches across all pages.
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, page: usize) -> Self {
        Self {
            total,
            page,
            per_page: DEFAULT_ITEMS_PER_PAGE,
            items,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page)
    }
}

impl From<ClientsResponse> for Page<Client> {
    fn from(response: ClientsResponse) -> Self {
        Self::new(response.clients, response.total, response.page)
    }
}

impl From<LoansResponse> for Page<Loan> {
    fn from(response: LoansResponse) -> Self {
        Self::new(response.loans, response.total, response.page)
    }
}

/// Reference values with the comparables behind them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValuationOverview {
    pub internal: f64,
    pub external: f64,
    pub recommended: f64,
    pub historical: Vec<ValuationItem>,
    pub market: Vec<ValuationItem>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }
}
