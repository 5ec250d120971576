//! Five-step pawn application wizard.
//!
//! A [`PawnWizard`] owns one in-memory [`WizardSession`] and walks the
//! operator through item details, device details, accessories, pictures and a
//! summary step where the client and final value are chosen. Nothing is
//! persisted until [`PawnWizard::submit`] hands the assembled loan to the loan
//! registry; the session is consumed on success and on [`PawnWizard::cancel`].

use std::fmt::{self, Display};
use std::sync::Arc;

use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::loan::{
    Accessories, DeviceDetails, Loan, LoanStatus, LoanType, NewLoan, PawnDetails, PawnTerms,
};
use crate::domain::types::{ClientId, SanitizedText};
use crate::domain::valuation::ValuationItem;
use crate::dto::wizard::{PictureView, WizardView};
use crate::forms::FieldErrors;
use crate::forms::client::ClientForm;
use crate::forms::pawn::{AccessoriesForm, DeviceDetailsForm, ItemDetailsForm};
use crate::repository::{ClientReader, ClientWriter, LoanWriter, ValuationReader};

pub mod back_office;
pub mod client_picker;
pub mod errors;
pub mod images;
pub mod valuation_panel;

use client_picker::ClientPicker;
use errors::{WizardError, WizardResult};
use images::{ImageBlob, Pictures, PreviewStore};
use valuation_panel::{Comparables, ValuationPanel};

/// Wizard steps, in order.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    ItemDetails,
    DeviceDetails,
    Accessories,
    Pictures,
    Summary,
}

impl WizardStep {
    pub const ALL: [Self; 5] = [
        Self::ItemDetails,
        Self::DeviceDetails,
        Self::Accessories,
        Self::Pictures,
        Self::Summary,
    ];

    const fn index(self) -> usize {
        match self {
            Self::ItemDetails => 0,
            Self::DeviceDetails => 1,
            Self::Accessories => 2,
            Self::Pictures => 3,
            Self::Summary => 4,
        }
    }

    /// One-based position shown to the operator.
    pub const fn number(self) -> usize {
        self.index() + 1
    }

    /// The step after `self`, `None` on the summary.
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::ItemDetails => "item details",
            Self::DeviceDetails => "device details",
            Self::Accessories => "accessories",
            Self::Pictures => "pictures",
            Self::Summary => "summary",
        }
    }
}

impl Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values collected so far. Each step's value is stored only once that step
/// has been submitted successfully.
#[derive(Debug, Default)]
pub struct WizardSession {
    step: WizardStep,
    item_details: Option<SanitizedText>,
    device_details: Option<DeviceDetails>,
    accessories: Option<Accessories>,
    pictures: Pictures,
    client_picker: ClientPicker,
    valuation: ValuationPanel,
}

impl WizardSession {
    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn item_details(&self) -> Option<&SanitizedText> {
        self.item_details.as_ref()
    }

    pub fn device_details(&self) -> Option<&DeviceDetails> {
        self.device_details.as_ref()
    }

    pub fn accessories(&self) -> Option<&Accessories> {
        self.accessories.as_ref()
    }

    pub fn pictures(&self) -> &Pictures {
        &self.pictures
    }

    pub fn client_picker(&self) -> &ClientPicker {
        &self.client_picker
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.client_picker.selected()
    }

    pub fn valuation(&self) -> &ValuationPanel {
        &self.valuation
    }

    fn advance(&mut self) {
        if let Some(next) = self.step.next() {
            self.step = next;
        }
    }
}

/// Submission was refused or the loan registry failed. The wizard comes back
/// untouched so the operator can fix the problem and retry.
pub struct SubmitRejected<'a, R: ?Sized> {
    pub wizard: PawnWizard<'a, R>,
    pub error: WizardError,
}

impl<R: ?Sized> fmt::Debug for SubmitRejected<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitRejected")
            .field("step", &self.wizard.session.step)
            .field("error", &self.error)
            .finish()
    }
}

/// A pawn application in progress, bound to its collaborators.
pub struct PawnWizard<'a, R: ?Sized> {
    repo: &'a R,
    previews: Arc<dyn PreviewStore>,
    terms: PawnTerms,
    session: WizardSession,
}

impl<R: ?Sized> PawnWizard<'_, R> {
    pub fn step(&self) -> WizardStep {
        self.session.step
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn terms(&self) -> PawnTerms {
        self.terms
    }

    fn expect_step(&self, expected: WizardStep) -> WizardResult<()> {
        if self.session.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                expected,
                current: self.session.step,
            })
        }
    }

    /// Step 1 form, prefilled with the stored description.
    pub fn item_details_form(&self) -> ItemDetailsForm {
        self.session
            .item_details
            .as_ref()
            .map(ItemDetailsForm::from)
            .unwrap_or_default()
    }

    pub fn submit_item_details(&mut self, form: &ItemDetailsForm) -> WizardResult<()> {
        self.expect_step(WizardStep::ItemDetails)?;
        self.session.item_details = Some(form.check()?);
        self.session.advance();
        Ok(())
    }

    pub fn device_details_form(&self) -> DeviceDetailsForm {
        self.session
            .device_details
            .as_ref()
            .map(DeviceDetailsForm::from)
            .unwrap_or_default()
    }

    /// All empty required attributes are reported together.
    pub fn submit_device_details(&mut self, form: &DeviceDetailsForm) -> WizardResult<()> {
        self.expect_step(WizardStep::DeviceDetails)?;
        self.session.device_details = Some(form.check()?);
        self.session.advance();
        Ok(())
    }

    pub fn accessories_form(&self) -> AccessoriesForm {
        self.session
            .accessories
            .as_ref()
            .map(AccessoriesForm::from)
            .unwrap_or_default()
    }

    pub fn submit_accessories(&mut self, form: &AccessoriesForm) -> WizardResult<()> {
        self.expect_step(WizardStep::Accessories)?;
        self.session.accessories = Some(form.check()?);
        self.session.advance();
        Ok(())
    }

    /// Attaches a picture and allocates its preview. Returns its position.
    pub fn add_image(&mut self, blob: ImageBlob) -> WizardResult<usize> {
        self.expect_step(WizardStep::Pictures)?;
        Ok(self.session.pictures.add(self.previews.clone(), blob)?)
    }

    /// Removes the picture at `index`, releasing its preview. Later pictures
    /// move down by one.
    pub fn remove_image(&mut self, index: usize) -> WizardResult<ImageBlob> {
        self.expect_step(WizardStep::Pictures)?;
        let len = self.session.pictures.len();
        self.session
            .pictures
            .remove(index)?
            .ok_or(WizardError::NoSuchImage { index, len })
    }

    pub fn submit_pictures(&mut self) -> WizardResult<()> {
        self.expect_step(WizardStep::Pictures)?;
        if self.session.pictures.is_empty() {
            return Err(FieldErrors::single("images", "At least one picture is required").into());
        }
        self.session.advance();
        Ok(())
    }

    /// Returns to the first step. Every collected value is kept.
    pub fn edit(&mut self) {
        self.session.step = WizardStep::ItemDetails;
    }

    /// Moves back to an earlier step (or stays put). Forward moves are
    /// rejected.
    pub fn back_to(&mut self, step: WizardStep) -> WizardResult<()> {
        if step > self.session.step {
            return Err(WizardError::WrongStep {
                expected: step,
                current: self.session.step,
            });
        }
        self.session.step = step;
        Ok(())
    }

    /// Filters the client snapshot.
    pub fn search_clients(&mut self, query: &str) -> WizardResult<Vec<&Client>> {
        self.expect_step(WizardStep::Summary)?;
        self.session.client_picker.set_query(query);
        Ok(self.session.client_picker.filtered())
    }

    pub fn select_client(&mut self, client_id: ClientId) -> WizardResult<&Client> {
        self.expect_step(WizardStep::Summary)?;
        Ok(self.session.client_picker.select(client_id)?)
    }

    /// Clears the selected client. The client registry is not touched.
    pub fn remove_selected_client(&mut self) -> WizardResult<Option<Client>> {
        self.expect_step(WizardStep::Summary)?;
        Ok(self.session.client_picker.remove_selected_client())
    }

    pub fn set_final_value(&mut self, value: Option<f64>) -> WizardResult<()> {
        self.expect_step(WizardStep::Summary)?;
        Ok(self.session.valuation.set_final_value(value)?)
    }

    /// Free-text entry of the final value; blank clears it.
    pub fn enter_final_value(&mut self, text: &str) -> WizardResult<Option<f64>> {
        self.expect_step(WizardStep::Summary)?;
        Ok(self.session.valuation.enter_final_value(text)?)
    }

    pub fn dismiss_comparables(&mut self, which: Comparables) {
        self.session.valuation.dismiss(which);
    }

    /// Serializable snapshot of the session for the host UI.
    pub fn view(&self) -> WizardView {
        let session = &self.session;
        WizardView {
            step: session.step,
            step_number: session.step.number(),
            item_details: self.item_details_form(),
            device_details: self.device_details_form(),
            accessories: self.accessories_form(),
            pictures: session
                .pictures
                .iter()
                .map(|picture| PictureView {
                    file_name: picture.blob.file_name.clone(),
                    content_type: picture.blob.content_type.clone(),
                    preview_uri: picture.preview.uri().to_string(),
                })
                .collect(),
            client_query: session.client_picker.query().to_string(),
            client_picker_open: session.client_picker.is_open(),
            matching_clients: session
                .client_picker
                .filtered()
                .into_iter()
                .cloned()
                .collect(),
            offers_client_creation: session.client_picker.offers_creation(),
            selected_client: session.client_picker.selected().cloned(),
            valuation: session.valuation.reference(),
            final_value: session.valuation.final_value(),
            historical_open: session.valuation.is_open(Comparables::Historical),
            market_open: session.valuation.is_open(Comparables::Market),
        }
    }

    /// Builds the loan record, reporting every missing precondition at once.
    pub fn assemble(&self) -> Result<NewLoan, FieldErrors> {
        let session = &self.session;
        let mut errors = FieldErrors::new();

        let client = session.client_picker.selected();
        if client.is_none() {
            errors.push("client", "Select a client");
        }
        let valuation = session.valuation.snapshot();
        if valuation.is_none() {
            errors.push("final_value", "Enter a final value");
        }
        if session.item_details.is_none() {
            errors.push("item_details", "Item details is required");
        }
        if session.device_details.is_none() {
            errors.push("device_details", "Device details are required");
        }
        if session.accessories.is_none() {
            errors.push("accessories", "Accessories are required");
        }
        if session.pictures.is_empty() {
            errors.push("images", "At least one picture is required");
        }

        match (
            client,
            valuation,
            &session.item_details,
            &session.device_details,
            &session.accessories,
        ) {
            (Some(client), Some(valuation), Some(item), Some(device), Some(accessories))
                if errors.is_empty() =>
            {
                Ok(NewLoan {
                    client_id: Some(client.id),
                    loan_type: LoanType::Pawn,
                    amount: valuation.final_value,
                    status: LoanStatus::Pending,
                    interest_rate: self.terms.interest_rate,
                    term: self.terms.term,
                    purpose: None,
                    collateral: None,
                    pawn: Some(PawnDetails {
                        item_details: item.clone(),
                        device: device.clone(),
                        accessories: accessories.clone(),
                        valuation,
                    }),
                    images: session.pictures.to_loan_images(),
                })
            }
            _ => Err(errors),
        }
    }

    /// Discards the session without creating anything, releasing every
    /// preview.
    pub fn cancel(mut self) {
        if let Err(e) = self.session.pictures.release_all() {
            log::warn!("Pawn application cancelled with unreleased previews: {e}");
        }
        log::info!("Pawn application cancelled");
    }
}

impl<'a, R> PawnWizard<'a, R>
where
    R: ClientReader + ClientWriter + LoanWriter + ValuationReader + ?Sized,
{
    /// Opens a fresh session on the first step. The client snapshot and the
    /// valuation reference are loaded up front.
    pub fn start(repo: &'a R, previews: Arc<dyn PreviewStore>) -> WizardResult<Self> {
        let client_picker = ClientPicker::load(repo).map_err(|e| {
            log::error!("Failed to load clients for a pawn application: {e}");
            WizardError::External(e)
        })?;
        let valuation = ValuationPanel::load(repo).map_err(|e| {
            log::error!("Failed to load valuation reference: {e}");
            WizardError::External(e)
        })?;

        Ok(Self {
            repo,
            previews,
            terms: PawnTerms::default(),
            session: WizardSession {
                client_picker,
                valuation,
                ..WizardSession::default()
            },
        })
    }

    /// Overrides the default pawn term and interest rate.
    pub fn with_terms(mut self, terms: PawnTerms) -> Self {
        self.terms = terms;
        self
    }

    /// Opens the client picker on a freshly loaded snapshot.
    pub fn open_client_picker(&mut self) -> WizardResult<()> {
        self.expect_step(WizardStep::Summary)?;
        self.session.client_picker.refresh(self.repo)?;
        self.session.client_picker.open();
        Ok(())
    }

    pub fn close_client_picker(&mut self) {
        self.session.client_picker.close();
    }

    /// Registers a new client and selects it.
    pub fn create_client(&mut self, form: &ClientForm) -> WizardResult<&Client> {
        self.expect_step(WizardStep::Summary)?;
        self.session.client_picker.create_client(self.repo, form)
    }

    /// Opens a comparables overlay and returns its rows.
    pub fn open_comparables(&mut self, which: Comparables) -> WizardResult<Vec<ValuationItem>> {
        Ok(self.session.valuation.open(self.repo, which)?)
    }

    /// Hands the assembled loan to the loan registry.
    ///
    /// On success the session is discarded and the created loan returned. A
    /// refused precondition or a registry failure gives the wizard back with
    /// every value intact; retrying is up to the operator.
    pub fn submit(self) -> Result<Loan, SubmitRejected<'a, R>> {
        if let Err(error) = self.expect_step(WizardStep::Summary) {
            return Err(SubmitRejected {
                wizard: self,
                error,
            });
        }

        let new_loan = match self.assemble() {
            Ok(new_loan) => new_loan,
            Err(errors) => {
                return Err(SubmitRejected {
                    wizard: self,
                    error: WizardError::Validation(errors),
                });
            }
        };

        match self.repo.create_loan(&new_loan) {
            Ok(loan) => {
                log::info!("Pawn application {} created", loan.id);
                Ok(loan)
            }
            Err(e) => {
                log::error!("Failed to create pawn application: {e}");
                Err(SubmitRejected {
                    wizard: self,
                    error: WizardError::External(e),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_advance_in_order() {
        assert_eq!(WizardStep::ItemDetails.next(), Some(WizardStep::DeviceDetails));
        assert_eq!(WizardStep::Pictures.next(), Some(WizardStep::Summary));
        assert_eq!(WizardStep::Summary.next(), None);
        assert_eq!(WizardStep::Summary.number(), 5);
        assert!(WizardStep::ItemDetails < WizardStep::Summary);
    }

    #[test]
    fn session_never_advances_past_summary() {
        let mut session = WizardSession::default();
        for _ in 0..10 {
            session.advance();
        }
        assert_eq!(session.step(), WizardStep::Summary);
    }

    #[test]
    fn step_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(WizardStep::DeviceDetails).unwrap(),
            serde_json::json!("device_details")
        );
    }
}
