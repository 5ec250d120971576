use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::{ClientEmail, ContactPhone, PersonName, PostalAddress};
use crate::forms::{FieldErrors, FormError, not_blank, validate_form};

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq, Eq)]
/// Form data for creating a client or saving an existing one.
pub struct ClientForm {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub phone: String,
    #[validate(custom(function = "not_blank"))]
    pub address: String,
}

/// Typed fields shared by [`NewClient`] and [`UpdateClient`].
struct ClientFields {
    first_name: PersonName,
    last_name: PersonName,
    email: ClientEmail,
    phone: ContactPhone,
    address: PostalAddress,
}

impl ClientForm {
    pub fn check(&self) -> Result<(), FieldErrors> {
        validate_form(self)
    }

    fn fields(&self) -> Result<ClientFields, FormError> {
        self.check()?;
        Ok(ClientFields {
            first_name: PersonName::new(&self.first_name).map_err(|_| FormError::InvalidName)?,
            last_name: PersonName::new(&self.last_name).map_err(|_| FormError::InvalidName)?,
            email: ClientEmail::new(&self.email).map_err(|_| FormError::InvalidEmail)?,
            phone: ContactPhone::new(&self.phone).map_err(|_| FormError::InvalidPhoneNumber)?,
            address: PostalAddress::new(&self.address).map_err(|_| FormError::InvalidAddress)?,
        })
    }

    /// Validate the form and convert it into a [`NewClient`].
    pub fn to_new_client(&self) -> Result<NewClient, FormError> {
        let fields = self.fields()?;
        Ok(NewClient::new(
            fields.first_name,
            fields.last_name,
            fields.email,
            fields.phone,
            fields.address,
        ))
    }

    /// Validate the form and convert it into an [`UpdateClient`].
    pub fn to_update_client(&self) -> Result<UpdateClient, FormError> {
        let fields = self.fields()?;
        Ok(UpdateClient {
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone: fields.phone,
            address: fields.address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ClientForm {
        ClientForm {
            first_name: " Ada ".to_string(),
            last_name: "Lovelace".to_string(),
            email: "Ada@Example.com".to_string(),
            phone: "(555) 000-1111".to_string(),
            address: "1 Analytical Way".to_string(),
        }
    }

    #[test]
    fn converts_valid_form() {
        let new_client = form().to_new_client().unwrap();
        assert_eq!(new_client.first_name.as_str(), "Ada");
        assert_eq!(new_client.email.as_str(), "ada@example.com");
    }

    #[test]
    fn reports_all_missing_fields() {
        let form = ClientForm {
            email: "broken".to_string(),
            ..ClientForm::default()
        };

        let errors = form.check().unwrap_err();

        assert_eq!(errors.len(), 5);
        assert!(errors.has("email"));
        assert!(
            errors
                .messages()
                .contains(&"Invalid email address".to_string())
        );
        assert!(matches!(
            form.to_update_client(),
            Err(FormError::Validation(_))
        ));
    }
}
