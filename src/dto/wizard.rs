//! Serializable snapshot of a pawn application in progress.

use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::valuation::ValuationReference;
use crate::forms::pawn::{AccessoriesForm, DeviceDetailsForm, ItemDetailsForm};
use crate::wizard::WizardStep;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PictureView {
    pub file_name: String,
    pub content_type: String,
    pub preview_uri: String,
}

/// Everything the host UI needs to render the current step.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WizardView {
    pub step: WizardStep,
    pub step_number: usize,
    pub item_details: ItemDetailsForm,
    pub device_details: DeviceDetailsForm,
    pub accessories: AccessoriesForm,
    pub pictures: Vec<PictureView>,
    pub client_query: String,
    pub client_picker_open: bool,
    pub matching_clients: Vec<Client>,
    pub offers_client_creation: bool,
    pub selected_client: Option<Client>,
    pub valuation: ValuationReference,
    #[serde(rename = "final")]
    pub final_value: Option<f64>,
    pub historical_open: bool,
    pub market_open: bool,
}
