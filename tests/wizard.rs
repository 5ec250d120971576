use std::cell::{Cell, RefCell};
use std::sync::Arc;

use chrono::Utc;
use pawn_desk::domain::client::{Client, NewClient, UpdateClient};
use pawn_desk::domain::loan::{Loan, LoanStatus, LoanType, NewLoan, PawnTerms, UpdateLoan};
use pawn_desk::domain::types::{
    ClientEmail, ClientId, ContactPhone, LoanId, PersonName, PostalAddress,
};
use pawn_desk::domain::valuation::ValuationItem;
use pawn_desk::forms::client::ClientForm;
use pawn_desk::forms::pawn::{AccessoriesForm, DeviceDetailsForm, ItemDetailsForm};
use pawn_desk::repository::errors::{RepositoryError, RepositoryResult};
use pawn_desk::repository::valuation::ComparablesCatalog;
use pawn_desk::repository::{
    ClientListQuery, ClientReader, ClientWriter, LoanWriter, ValuationReader,
};
use pawn_desk::wizard::errors::WizardError;
use pawn_desk::wizard::images::{ImageBlob, InMemoryPreviewStore};
use pawn_desk::wizard::valuation_panel::Comparables;
use pawn_desk::wizard::{PawnWizard, WizardStep};

/// In-memory stand-in for the client registry, loan registry and valuation
/// reference.
struct FakeBackOffice {
    clients: RefCell<Vec<Client>>,
    loans: RefCell<Vec<Loan>>,
    submitted: RefCell<Vec<NewLoan>>,
    fail_create_loan: Cell<bool>,
    catalog: ComparablesCatalog,
}

fn client(id: i32, first: &str, last: &str, email: &str, phone: &str) -> Client {
    let now = Utc::now().naive_utc();
    Client {
        id: ClientId::new(id).unwrap(),
        first_name: PersonName::new(first).unwrap(),
        last_name: PersonName::new(last).unwrap(),
        email: ClientEmail::new(email).unwrap(),
        phone: ContactPhone::new(phone).unwrap(),
        address: PostalAddress::new("123 Main St").unwrap(),
        created_at: now,
        updated_at: now,
    }
}

impl FakeBackOffice {
    fn new() -> Self {
        Self {
            clients: RefCell::new(vec![
                client(1, "Jane", "Smith", "jane@example.com", "(555) 123-4567"),
                client(2, "John", "Doe", "john@example.com", "(555) 987-6543"),
            ]),
            loans: RefCell::new(Vec::new()),
            submitted: RefCell::new(Vec::new()),
            fail_create_loan: Cell::new(false),
            catalog: ComparablesCatalog::default(),
        }
    }
}

impl ClientReader for FakeBackOffice {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        Ok(self.clients.borrow().iter().find(|c| c.id == id).cloned())
    }

    fn list_clients(&self, _query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        let clients = self.clients.borrow().clone();
        Ok((clients.len(), clients))
    }
}

impl ClientWriter for FakeBackOffice {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let id = self.clients.borrow().len() as i32 + 1;
        let created = client(
            id,
            new_client.first_name.as_str(),
            new_client.last_name.as_str(),
            new_client.email.as_str(),
            new_client.phone.as_str(),
        );
        self.clients.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn update_client(&self, _id: ClientId, _updates: &UpdateClient) -> RepositoryResult<Client> {
        Err(RepositoryError::NotFound)
    }
}

impl LoanWriter for FakeBackOffice {
    fn create_loan(&self, new_loan: &NewLoan) -> RepositoryResult<Loan> {
        self.submitted.borrow_mut().push(new_loan.clone());
        if self.fail_create_loan.get() {
            return Err(RepositoryError::ConnectionError("database is down".to_string()));
        }
        let now = Utc::now().naive_utc();
        let loan = Loan {
            id: LoanId::new(self.loans.borrow().len() as i32 + 1).unwrap(),
            client_id: new_loan.client_id,
            loan_type: new_loan.loan_type,
            amount: new_loan.amount,
            status: new_loan.status,
            interest_rate: new_loan.interest_rate,
            term: new_loan.term,
            purpose: new_loan.purpose.clone(),
            collateral: new_loan.collateral.clone(),
            pawn: new_loan.pawn.clone(),
            images: new_loan.images.clone(),
            created_at: now,
            updated_at: now,
        };
        self.loans.borrow_mut().push(loan.clone());
        Ok(loan)
    }

    fn update_loan(&self, _id: LoanId, _updates: &UpdateLoan) -> RepositoryResult<Loan> {
        Err(RepositoryError::NotFound)
    }

    fn update_loan_status(&self, _id: LoanId, _status: LoanStatus) -> RepositoryResult<Loan> {
        Err(RepositoryError::NotFound)
    }
}

impl ValuationReader for FakeBackOffice {
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

fn photo(name: &str) -> ImageBlob {
    ImageBlob::new(name, "image/jpeg", name.as_bytes().to_vec())
}

/// Walks a fresh wizard to the summary step with one picture attached.
fn to_summary<'a>(
    repo: &'a FakeBackOffice,
    store: &Arc<InMemoryPreviewStore>,
) -> PawnWizard<'a, FakeBackOffice> {
    let mut wizard = PawnWizard::start(repo, store.clone()).unwrap();

    wizard
        .submit_item_details(&ItemDetailsForm::new("Gold ring, 14k"))
        .unwrap();
    wizard
        .submit_device_details(&DeviceDetailsForm::required("Jewelry", "N/A", "N/A", "Gold"))
        .unwrap();
    wizard
        .submit_accessories(&AccessoriesForm {
            has_charger: false,
            has_other_accessories: false,
            accessories_description: String::new(),
        })
        .unwrap();
    wizard.add_image(photo("ring.jpg")).unwrap();
    wizard.submit_pictures().unwrap();

    assert_eq!(wizard.step(), WizardStep::Summary);
    wizard
}

#[test]
fn test_full_pawn_application() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = to_summary(&repo, &store);

    wizard.select_client(ClientId::new(2).unwrap()).unwrap();
    wizard.set_final_value(Some(350.0)).unwrap();

    let loan = wizard.submit().unwrap();

    assert_eq!(loan.status, LoanStatus::Pending);
    assert_eq!(loan.loan_type, LoanType::Pawn);
    assert_eq!(loan.client_id, Some(ClientId::new(2).unwrap()));
    assert_eq!(loan.amount, 350.0);
    assert_eq!(loan.term, 12);
    assert_eq!(loan.interest_rate, 5.0);

    let pawn = loan.pawn.unwrap();
    assert_eq!(pawn.valuation.final_value, 350.0);
    assert_eq!(pawn.valuation.recommended, 450.0);
    assert_eq!(pawn.item_details.as_str(), "Gold ring, 14k");
    assert_eq!(pawn.device.color, "Gold");
    assert_eq!(loan.images.len(), 1);

    // The session is gone together with its previews.
    assert!(store.is_empty());
    assert_eq!(repo.loans.borrow().len(), 1);
}

#[test]
fn test_submit_without_client_and_value_reports_both() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let wizard = to_summary(&repo, &store);
    let before = wizard.view();

    let rejected = wizard.submit().unwrap_err();

    let errors = rejected.error.field_errors().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.has("client"));
    assert!(errors.has("final_value"));
    assert_eq!(rejected.error.messages().len(), 2);

    assert_eq!(rejected.wizard.view(), before);
    assert_eq!(store.len(), 1);
    assert!(repo.submitted.borrow().is_empty());
}

#[test]
fn test_submit_blocked_by_either_missing_value() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());

    let mut wizard = to_summary(&repo, &store);
    wizard.set_final_value(Some(100.0)).unwrap();
    let rejected = wizard.submit().unwrap_err();
    let errors = rejected.error.field_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors.has("client"));

    let mut wizard = rejected.wizard;
    wizard.select_client(ClientId::new(1).unwrap()).unwrap();
    wizard.set_final_value(None).unwrap();
    let rejected = wizard.submit().unwrap_err();
    let errors = rejected.error.field_errors().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors.has("final_value"));
}

#[test]
fn test_edit_round_trip_keeps_assembled_loan() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = to_summary(&repo, &store);
    wizard.select_client(ClientId::new(1).unwrap()).unwrap();
    wizard.set_final_value(Some(420.0)).unwrap();
    let assembled = wizard.assemble().unwrap();

    wizard.edit();
    assert_eq!(wizard.step(), WizardStep::ItemDetails);

    // Resubmit every step with the prefilled values, unchanged.
    let item = wizard.item_details_form();
    assert_eq!(item.item_details, "Gold ring, 14k");
    wizard.submit_item_details(&item).unwrap();
    let device = wizard.device_details_form();
    wizard.submit_device_details(&device).unwrap();
    let accessories = wizard.accessories_form();
    wizard.submit_accessories(&accessories).unwrap();
    wizard.submit_pictures().unwrap();

    assert_eq!(wizard.step(), WizardStep::Summary);
    assert_eq!(wizard.assemble().unwrap(), assembled);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_steps_cannot_be_skipped() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = PawnWizard::start(&repo, store.clone()).unwrap();

    let err = wizard
        .submit_device_details(&DeviceDetailsForm::required("Phone", "Apple", "13", "Blue"))
        .unwrap_err();
    assert!(matches!(
        err,
        WizardError::WrongStep {
            expected: WizardStep::DeviceDetails,
            current: WizardStep::ItemDetails,
        }
    ));
    assert!(wizard.add_image(photo("a.jpg")).is_err());
    assert!(store.is_empty());

    assert!(wizard.back_to(WizardStep::Pictures).is_err());
    assert_eq!(wizard.step(), WizardStep::ItemDetails);
}

#[test]
fn test_validation_failures_keep_the_step() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = PawnWizard::start(&repo, store.clone()).unwrap();

    let err = wizard
        .submit_item_details(&ItemDetailsForm::new("   "))
        .unwrap_err();
    assert!(err.field_errors().unwrap().has("item_details"));
    assert_eq!(wizard.step(), WizardStep::ItemDetails);

    wizard
        .submit_item_details(&ItemDetailsForm::new("Laptop"))
        .unwrap();

    let err = wizard
        .submit_device_details(&DeviceDetailsForm::default())
        .unwrap_err();
    let errors = err.field_errors().unwrap();
    for field in ["device_type", "manufacturer", "model", "color"] {
        assert!(errors.has(field), "missing error for {field}");
    }
    assert_eq!(wizard.step(), WizardStep::DeviceDetails);

    wizard
        .submit_device_details(&DeviceDetailsForm::required("Laptop", "Lenovo", "X1", "Black"))
        .unwrap();

    let err = wizard
        .submit_accessories(&AccessoriesForm {
            has_charger: true,
            has_other_accessories: true,
            accessories_description: " ".to_string(),
        })
        .unwrap_err();
    assert!(err.field_errors().unwrap().has("accessories_description"));

    wizard
        .submit_accessories(&AccessoriesForm {
            has_charger: true,
            has_other_accessories: true,
            accessories_description: "Sleeve".to_string(),
        })
        .unwrap();

    let err = wizard.submit_pictures().unwrap_err();
    assert!(err.field_errors().unwrap().has("images"));
    assert_eq!(wizard.step(), WizardStep::Pictures);
}

#[test]
fn test_image_removal_preserves_order_and_releases() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = to_summary(&repo, &store);
    wizard.back_to(WizardStep::Pictures).unwrap();

    for name in ["b.jpg", "c.jpg", "d.jpg"] {
        wizard.add_image(photo(name)).unwrap();
    }
    assert_eq!(store.len(), 4);
    let removed_uri = wizard.view().pictures[1].preview_uri.clone();

    let removed = wizard.remove_image(1).unwrap();

    assert_eq!(removed.file_name, "b.jpg");
    let names: Vec<String> = wizard
        .view()
        .pictures
        .into_iter()
        .map(|p| p.file_name)
        .collect();
    assert_eq!(names, vec!["ring.jpg", "c.jpg", "d.jpg"]);
    assert!(!store.contains(&removed_uri));
    assert_eq!(store.len(), 3);

    assert!(matches!(
        wizard.remove_image(7),
        Err(WizardError::NoSuchImage { index: 7, len: 3 })
    ));
}

#[test]
fn test_registry_failure_keeps_session_for_retry() {
    let repo = FakeBackOffice::new();
    repo.fail_create_loan.set(true);
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = to_summary(&repo, &store);
    wizard.select_client(ClientId::new(2).unwrap()).unwrap();
    wizard.set_final_value(Some(350.0)).unwrap();
    let before = wizard.view();

    let rejected = wizard.submit().unwrap_err();

    assert!(matches!(rejected.error, WizardError::External(_)));
    assert_eq!(rejected.wizard.view(), before);
    assert_eq!(store.len(), 1);

    repo.fail_create_loan.set(false);
    let loan = rejected.wizard.submit().unwrap();
    assert_eq!(loan.amount, 350.0);

    // Both attempts carried the same record.
    let submitted = repo.submitted.borrow();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0], submitted[1]);
    assert!(store.is_empty());
}

#[test]
fn test_cancel_releases_previews_without_creating() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = to_summary(&repo, &store);
    wizard.back_to(WizardStep::Pictures).unwrap();
    wizard.add_image(photo("extra.jpg")).unwrap();
    assert_eq!(store.len(), 2);

    wizard.cancel();

    assert!(store.is_empty());
    assert!(repo.submitted.borrow().is_empty());
}

#[test]
fn test_client_picker_create_and_remove() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = to_summary(&repo, &store);

    wizard.open_client_picker().unwrap();
    assert!(wizard.search_clients("ADA").unwrap().is_empty());
    assert!(wizard.view().offers_client_creation);

    let created = wizard
        .create_client(&ClientForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "12 Analytical Row".to_string(),
        })
        .unwrap()
        .id;
    assert_eq!(
        wizard.session().selected_client().map(|c| c.id),
        Some(created)
    );
    assert_eq!(repo.clients.borrow().len(), 3);

    let removed = wizard.remove_selected_client().unwrap();
    assert_eq!(removed.map(|c| c.id), Some(created));
    assert!(wizard.session().selected_client().is_none());
    assert_eq!(repo.clients.borrow().len(), 3);

    assert_eq!(wizard.search_clients("").unwrap().len(), 3);
}

#[test]
fn test_valuation_panel_overlays_and_terms() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = to_summary(&repo, &store).with_terms(PawnTerms {
        term: 6,
        interest_rate: 4.0,
    });

    let view = wizard.view();
    assert_eq!(view.valuation.internal, 400.0);
    assert_eq!(view.valuation.external, 490.0);
    assert_eq!(view.valuation.recommended, 450.0);
    assert_eq!(view.final_value, None);

    let market = wizard.open_comparables(Comparables::Market).unwrap();
    assert_eq!(market.len(), 2);
    assert!(wizard.view().market_open);
    wizard.dismiss_comparables(Comparables::Market);
    assert!(!wizard.view().market_open);

    assert!(wizard.enter_final_value("lots").is_err());
    assert_eq!(wizard.enter_final_value("1200").unwrap(), Some(1200.0));
    wizard.select_client(ClientId::new(1).unwrap()).unwrap();

    let loan = wizard.submit().unwrap();
    assert_eq!(loan.amount, 1200.0);
    assert_eq!((loan.term, loan.interest_rate), (6, 4.0));
}

#[test]
fn test_non_finite_final_value_never_reaches_the_registry() {
    let repo = FakeBackOffice::new();
    let store = Arc::new(InMemoryPreviewStore::new());
    let mut wizard = to_summary(&repo, &store);
    wizard.select_client(ClientId::new(2).unwrap()).unwrap();

    let err = wizard.set_final_value(Some(f64::NAN)).unwrap_err();
    assert!(err.field_errors().unwrap().has("final_value"));
    assert_eq!(wizard.view().final_value, None);

    let rejected = wizard.submit().unwrap_err();
    assert!(rejected.error.field_errors().unwrap().has("final_value"));
    assert!(repo.submitted.borrow().is_empty());
}
