//! Production collaborators of the pawn wizard.

use std::sync::Arc;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::loan::{Loan, LoanStatus, NewLoan, PawnTerms, UpdateLoan};
use crate::domain::types::{ClientId, LoanId};
use crate::domain::valuation::ValuationItem;
use crate::models::config::ServerConfig;
use crate::repository::errors::RepositoryResult;
use crate::repository::valuation::ComparablesCatalog;
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, DieselRepository, LoanListQuery, LoanReader,
    LoanWriter, ValuationReader,
};
use crate::wizard::PawnWizard;
use crate::wizard::errors::WizardResult;
use crate::wizard::images::PreviewStore;

/// Client and loan registries on the shop database, the configured
/// comparables catalog and the pawn terms applied to new applications.
#[derive(Clone)]
pub struct PawnBackOffice {
    repo: DieselRepository,
    catalog: ComparablesCatalog,
    terms: PawnTerms,
}

impl PawnBackOffice {
    pub fn new(repo: DieselRepository, catalog: ComparablesCatalog, terms: PawnTerms) -> Self {
        Self {
            repo,
            catalog,
            terms,
        }
    }

    /// Takes the catalog and pawn terms from the loaded configuration.
    pub fn from_config(repo: DieselRepository, config: &ServerConfig) -> Self {
        Self::new(repo, config.valuation.clone(), config.pawn_terms)
    }

    pub fn repo(&self) -> &DieselRepository {
        &self.repo
    }

    pub fn catalog(&self) -> &ComparablesCatalog {
        &self.catalog
    }

    pub fn terms(&self) -> PawnTerms {
        self.terms
    }

    /// Opens a pawn application bound to this back office with the
    /// configured terms.
    pub fn start_wizard(
        &self,
        previews: Arc<dyn PreviewStore>,
    ) -> WizardResult<PawnWizard<'_, Self>> {
        Ok(PawnWizard::start(self, previews)?.with_terms(self.terms))
    }
}

impl ClientReader for PawnBackOffice {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        self.repo.get_client_by_id(id)
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        self.repo.list_clients(query)
    }
}

impl ClientWriter for PawnBackOffice {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        self.repo.create_client(new_client)
    }

    fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        self.repo.update_client(client_id, updates)
    }
}

impl LoanReader for PawnBackOffice {
    fn get_loan_by_id(&self, id: LoanId) -> RepositoryResult<Option<Loan>> {
        self.repo.get_loan_by_id(id)
    }

    fn list_loans(&self, query: LoanListQuery) -> RepositoryResult<(usize, Vec<Loan>)> {
        self.repo.list_loans(query)
    }
}

impl LoanWriter for PawnBackOffice {
    fn create_loan(&self, new_loan: &NewLoan) -> RepositoryResult<Loan> {
        self.repo.create_loan(new_loan)
    }

    fn update_loan(&self, loan_id: LoanId, updates: &UpdateLoan) -> RepositoryResult<Loan> {
        self.repo.update_loan(loan_id, updates)
    }

    fn update_loan_status(&self, loan_id: LoanId, status: LoanStatus) -> RepositoryResult<Loan> {
        self.repo.update_loan_status(loan_id, status)
    }
}

impl ValuationReader for PawnBackOffice {
    fn internal_valuation(&self) -> RepositoryResult<f64> {
        self.catalog.internal_valuation()
    }

    fn external_valuation(&self) -> RepositoryResult<f64> {
        self.catalog.external_valuation()
    }

    fn recommended_valuation(&self) -> RepositoryResult<f64> {
        self.catalog.recommended_valuation()
    }

    fn list_comparable_historical(&self) -> RepositoryResult<Vec<ValuationItem>> {
        self.catalog.list_comparable_historical()
    }

    fn list_comparable_market(&self) -> RepositoryResult<Vec<ValuationItem>> {
        self.catalog.list_comparable_market()
    }
}
