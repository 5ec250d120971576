use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientEmail, ClientId, ContactPhone, PersonName, PostalAddress};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: ClientEmail,
    pub phone: ContactPhone,
    pub address: PostalAddress,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Client {
    /// Display name in "First Last" order.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match across name, email and phone.
    ///
    /// An empty query matches every client.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewClient {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: ClientEmail,
    pub phone: ContactPhone,
    pub address: PostalAddress,
}

impl NewClient {
    #[must_use]
    pub fn new(
        first_name: PersonName,
        last_name: PersonName,
        email: ClientEmail,
        phone: ContactPhone,
        address: PostalAddress,
    ) -> Self {
        Self {
            first_name,
            last_name,
            email,
            phone,
            address,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UpdateClient {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: ClientEmail,
    pub phone: ContactPhone,
    pub address: PostalAddress,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn client(first: &str, last: &str, email: &str, phone: &str) -> Client {
        let now = Utc::now().naive_utc();
        Client {
            id: ClientId::new(1).unwrap(),
            first_name: PersonName::new(first).unwrap(),
            last_name: PersonName::new(last).unwrap(),
            email: ClientEmail::new(email).unwrap(),
            phone: ContactPhone::new(phone).unwrap(),
            address: PostalAddress::new("123 Main St").unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn matches_any_field_ignoring_case() {
        let c = client("John", "Doe", "john.doe@example.com", "(555) 123-4567");

        assert!(c.matches("JOHN"));
        assert!(c.matches("doe"));
        assert!(c.matches("example.COM"));
        assert!(c.matches("123-45"));
        assert!(c.matches(""));
        assert!(!c.matches("smith"));
    }

    #[test]
    fn address_is_not_searched() {
        let c = client("John", "Doe", "john.doe@example.com", "(555) 123-4567");
        assert!(!c.matches("main st"));
    }

    #[test]
    fn full_name_joins_parts() {
        let c = client("Jane", "Smith", "jane@example.com", "1");
        assert_eq!(c.full_name(), "Jane Smith");
    }
}
