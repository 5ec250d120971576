use crate::{
    db::{DbConnection, DbPool},
    domain::{
        client::{Client, NewClient, UpdateClient},
        loan::{Loan, LoanStatus, LoanType, NewLoan, UpdateLoan},
        types::{ClientId, LoanId},
        valuation::ValuationItem,
    },
    repository::errors::RepositoryResult,
};

pub mod client;
pub mod errors;
pub mod loan;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod valuation;

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Rows to skip before this page, `None` when the page lies beyond
    /// anything SQLite can address.
    pub fn offset(&self) -> Option<i64> {
        let skipped = (self.page.max(1) - 1).checked_mul(self.per_page)?;
        i64::try_from(skipped).ok()
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoanListQuery {
    pub status: Option<LoanStatus>,
    pub loan_type: Option<LoanType>,
    pub client_id: Option<ClientId>,
    pub pagination: Option<Pagination>,
}

impl LoanListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: LoanStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn loan_type(mut self, loan_type: LoanType) -> Self {
        self.loan_type = Some(loan_type);
        self
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    /// Returns the total number of matches and the requested page.
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, client_id: ClientId, updates: &UpdateClient)
    -> RepositoryResult<Client>;
}

pub trait LoanReader {
    fn get_loan_by_id(&self, id: LoanId) -> RepositoryResult<Option<Loan>>;
    /// Returns the total number of matches and the requested page.
    fn list_loans(&self, query: LoanListQuery) -> RepositoryResult<(usize, Vec<Loan>)>;
}

pub trait LoanWriter {
    fn create_loan(&self, new_loan: &NewLoan) -> RepositoryResult<Loan>;
    fn update_loan(&self, loan_id: LoanId, updates: &UpdateLoan) -> RepositoryResult<Loan>;
    fn update_loan_status(&self, loan_id: LoanId, status: LoanStatus) -> RepositoryResult<Loan>;
}

/// Reference values and comparables used by the valuation panel.
pub trait ValuationReader {
    fn internal_valuation(&self) -> RepositoryResult<f64>;
    fn external_valuation(&self) -> RepositoryResult<f64>;
    fn recommended_valuation(&self) -> RepositoryResult<f64>;
    fn list_comparable_historical(&self) -> RepositoryResult<Vec<ValuationItem>>;
    fn list_comparable_market(&self) -> RepositoryResult<Vec<ValuationItem>>;
}

/// Diesel-backed implementation of the client and loan registries.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}
