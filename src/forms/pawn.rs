//! Forms collected by the pawn application wizard, one per data-entry step.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::loan::{Accessories, DeviceDetails};
use crate::domain::types::{SanitizedText, strip_markup};
use crate::forms::{FieldErrors, not_blank, optional_text, validate_form};

/// Step 1: free-text description of the pawned item.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct ItemDetailsForm {
    #[validate(custom(function = "not_blank"))]
    pub item_details: String,
}

impl ItemDetailsForm {
    pub fn new(item_details: impl Into<String>) -> Self {
        Self {
            item_details: item_details.into(),
        }
    }

    /// Validates the form and returns the sanitized description.
    pub fn check(&self) -> Result<SanitizedText, FieldErrors> {
        validate_form(self)?;
        SanitizedText::new(self.item_details.as_str())
            .map_err(|_| FieldErrors::single("item_details", "Item details is required"))
    }
}

impl From<&SanitizedText> for ItemDetailsForm {
    fn from(value: &SanitizedText) -> Self {
        Self::new(value.as_str())
    }
}

/// Step 2: structured device attributes.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct DeviceDetailsForm {
    #[serde(rename = "type")]
    #[validate(custom(function = "not_blank"))]
    pub device_type: String,
    #[validate(custom(function = "not_blank"))]
    pub manufacturer: String,
    #[validate(custom(function = "not_blank"))]
    pub model: String,
    #[validate(custom(function = "not_blank"))]
    pub color: String,
    #[serde(default)]
    pub screen_size: String,
    #[serde(default)]
    pub ram: String,
    #[serde(default)]
    pub camera: String,
    #[serde(default)]
    pub sim_cards: String,
    #[serde(default)]
    pub storage: String,
}

impl DeviceDetailsForm {
    /// Form with only the required attributes filled in.
    pub fn required(
        device_type: impl Into<String>,
        manufacturer: impl Into<String>,
        model: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            device_type: device_type.into(),
            manufacturer: manufacturer.into(),
            model: model.into(),
            color: color.into(),
            ..Self::default()
        }
    }

    /// Validates every required attribute at once.
    pub fn check(&self) -> Result<DeviceDetails, FieldErrors> {
        validate_form(self)?;
        Ok(DeviceDetails {
            device_type: self.device_type.trim().to_string(),
            manufacturer: self.manufacturer.trim().to_string(),
            model: self.model.trim().to_string(),
            color: self.color.trim().to_string(),
            screen_size: optional_text(&self.screen_size),
            ram: optional_text(&self.ram),
            camera: optional_text(&self.camera),
            sim_cards: optional_text(&self.sim_cards),
            storage: optional_text(&self.storage),
        })
    }
}

impl From<&DeviceDetails> for DeviceDetailsForm {
    fn from(device: &DeviceDetails) -> Self {
        Self {
            device_type: device.device_type.clone(),
            manufacturer: device.manufacturer.clone(),
            model: device.model.clone(),
            color: device.color.clone(),
            screen_size: device.screen_size.clone().unwrap_or_default(),
            ram: device.ram.clone().unwrap_or_default(),
            camera: device.camera.clone().unwrap_or_default(),
            sim_cards: device.sim_cards.clone().unwrap_or_default(),
            storage: device.storage.clone().unwrap_or_default(),
        }
    }
}

/// Step 3: accessory flags.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessoriesForm {
    #[serde(default)]
    pub has_charger: bool,
    #[serde(default)]
    pub has_other_accessories: bool,
    #[serde(default)]
    pub accessories_description: String,
}

impl AccessoriesForm {
    /// The description is required only when other accessories are declared;
    /// otherwise it is dropped.
    pub fn check(&self) -> Result<Accessories, FieldErrors> {
        let description = optional_text(&self.accessories_description)
            .map(|text| strip_markup(&text))
            .and_then(|text| optional_text(&text));

        if self.has_other_accessories && description.is_none() {
            return Err(FieldErrors::single(
                "accessories_description",
                "Describe the other accessories",
            ));
        }

        Ok(Accessories {
            has_charger: self.has_charger,
            has_other_accessories: self.has_other_accessories,
            description: if self.has_other_accessories {
                description
            } else {
                None
            },
        })
    }
}

impl From<&Accessories> for AccessoriesForm {
    fn from(accessories: &Accessories) -> Self {
        Self {
            has_charger: accessories.has_charger,
            has_other_accessories: accessories.has_other_accessories,
            accessories_description: accessories.description.clone().unwrap_or_default(),
        }
    }
}
