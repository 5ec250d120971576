//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::loan::{Loan, LoanStatus, NewLoan, UpdateLoan};
use crate::domain::types::{ClientId, LoanId};
use crate::domain::valuation::ValuationItem;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, LoanListQuery, LoanReader, LoanWriter,
    ValuationReader,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(
            &self,
            client_id: ClientId,
            updates: &UpdateClient,
        ) -> RepositoryResult<Client>;
    }

    impl LoanReader for Repository {
        fn get_loan_by_id(&self, id: LoanId) -> RepositoryResult<Option<Loan>>;
        fn list_loans(&self, query: LoanListQuery) -> RepositoryResult<(usize, Vec<Loan>)>;
    }

    impl LoanWriter for Repository {
        fn create_loan(&self, new_loan: &NewLoan) -> RepositoryResult<Loan>;
        fn update_loan(&self, loan_id: LoanId, updates: &UpdateLoan) -> RepositoryResult<Loan>;
        fn update_loan_status(&self, loan_id: LoanId, status: LoanStatus) -> RepositoryResult<Loan>;
    }

    impl ValuationReader for Repository {
        fn internal_valuation(&self) -> RepositoryResult<f64>;
        fn external_valuation(&self) -> RepositoryResult<f64>;
        fn recommended_valuation(&self) -> RepositoryResult<f64>;
        fn list_comparable_historical(&self) -> RepositoryResult<Vec<ValuationItem>>;
        fn list_comparable_market(&self) -> RepositoryResult<Vec<ValuationItem>>;
    }
}
