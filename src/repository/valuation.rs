//! Config-backed valuation reference catalog.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::valuation::{ValuationItem, ValuationReference};
use crate::repository::ValuationReader;
use crate::repository::errors::RepositoryResult;

/// Comparable items the shop values pawns against.
///
/// `historical` holds devices previously pawned at the shop, `market` holds
/// listings collected from external marketplaces.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComparablesCatalog {
    pub historical: Vec<ValuationItem>,
    pub market: Vec<ValuationItem>,
}

fn item(id: i32, model: &str, value: f64, (y, m, d): (i32, u32, u32)) -> ValuationItem {
    ValuationItem {
        id,
        device_type: "Smartphone".to_string(),
        manufacturer: "Apple".to_string(),
        model: model.to_string(),
        value,
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
    }
}

impl Default for ComparablesCatalog {
    fn default() -> Self {
        Self {
            historical: vec![
                item(1, "iPhone 13", 450.0, (2024, 2, 15)),
                item(2, "iPhone 12", 350.0, (2024, 2, 10)),
            ],
            market: vec![
                item(1, "iPhone 13", 500.0, (2024, 2, 20)),
                item(2, "iPhone 13", 480.0, (2024, 2, 19)),
            ],
        }
    }
}

fn mean(items: &[ValuationItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().map(|item| item.value).sum::<f64>() / items.len() as f64
}

impl ComparablesCatalog {
    pub fn new(historical: Vec<ValuationItem>, market: Vec<ValuationItem>) -> Self {
        Self { historical, market }
    }

    /// All three reference values at once.
    pub fn reference(&self) -> ValuationReference {
        let internal = mean(&self.historical);
        let external = mean(&self.market);
        ValuationReference {
            internal,
            external,
            recommended: ((internal + external) / 2.0 / 10.0).round() * 10.0,
        }
    }
}

impl ValuationReader for ComparablesCatalog {
    fn internal_valuation(&self) -> RepositoryResult<f64> {
        Ok(self.reference().internal)
    }

    fn external_valuation(&self) -> RepositoryResult<f64> {
        Ok(self.reference().external)
    }

    fn recommended_valuation(&self) -> RepositoryResult<f64> {
        Ok(self.reference().recommended)
    }

    fn list_comparable_historical(&self) -> RepositoryResult<Vec<ValuationItem>> {
        Ok(self.historical.clone())
    }

    fn list_comparable_market(&self) -> RepositoryResult<Vec<ValuationItem>> {
        Ok(self.market.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_reproduces_seed_reference() {
        let catalog = ComparablesCatalog::default();

        assert_eq!(catalog.internal_valuation().unwrap(), 400.0);
        assert_eq!(catalog.external_valuation().unwrap(), 490.0);
        assert_eq!(catalog.recommended_valuation().unwrap(), 450.0);
        assert_eq!(catalog.list_comparable_historical().unwrap().len(), 2);
        assert_eq!(catalog.list_comparable_market().unwrap()[0].value, 500.0);
    }

    #[test]
    fn empty_catalog_yields_zero() {
        let catalog = ComparablesCatalog::new(Vec::new(), Vec::new());
        assert_eq!(catalog.reference(), ValuationReference::default());
    }

    #[test]
    fn recommended_rounds_to_nearest_ten() {
        let catalog = ComparablesCatalog::new(
            vec![item(1, "Pixel 7", 212.0, (2024, 1, 1))],
            vec![item(1, "Pixel 7", 250.0, (2024, 1, 2))],
        );
        // midpoint 231
        assert_eq!(catalog.recommended_valuation().unwrap(), 230.0);
    }

    #[test]
    fn deserializes_from_config_shape() {
        let catalog: ComparablesCatalog = serde_json::from_value(serde_json::json!({
            "historical": [{
                "id": 9,
                "device_type": "Laptop",
                "manufacturer": "Lenovo",
                "model": "X1",
                "value": 600.0,
                "date": "2024-03-01"
            }]
        }))
        .unwrap();

        assert_eq!(catalog.historical[0].model, "X1");
        // Missing lists fall back to the seed comparables.
        assert_eq!(catalog.market.len(), 2);
    }
}
