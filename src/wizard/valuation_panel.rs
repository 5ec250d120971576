//! Reference prices next to the operator's final value.

use serde::Serialize;

use crate::domain::loan::ValuationSnapshot;
use crate::domain::valuation::{ValuationItem, ValuationReference};
use crate::forms::FieldErrors;
use crate::repository::ValuationReader;
use crate::repository::errors::RepositoryResult;

/// Which comparables overlay is requested.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Comparables {
    /// Devices previously pawned at the shop, backing the internal value.
    Historical,
    /// Marketplace listings, backing the external value.
    Market,
}

fn not_a_number() -> FieldErrors {
    FieldErrors::single("final_value", "Final value must be a number")
}

#[derive(Debug, Default)]
pub struct ValuationPanel {
    reference: ValuationReference,
    final_value: Option<f64>,
    historical_open: bool,
    market_open: bool,
}

impl ValuationPanel {
    /// Reads the three reference values. They are displayed as-is.
    pub fn load<R: ValuationReader + ?Sized>(repo: &R) -> RepositoryResult<Self> {
        let reference = ValuationReference {
            internal: repo.internal_valuation()?,
            external: repo.external_valuation()?,
            recommended: repo.recommended_valuation()?,
        };
        Ok(Self {
            reference,
            ..Self::default()
        })
    }

    pub fn reference(&self) -> ValuationReference {
        self.reference
    }

    pub fn final_value(&self) -> Option<f64> {
        self.final_value
    }

    /// Operator override. Any finite value is accepted, including ones far
    /// from the recommendation.
    pub fn set_final_value(&mut self, value: Option<f64>) -> Result<(), FieldErrors> {
        if value.is_some_and(|value| !value.is_finite()) {
            return Err(not_a_number());
        }
        self.final_value = value;
        Ok(())
    }

    /// Parses free text entry: blank clears the value.
    pub fn enter_final_value(&mut self, text: &str) -> Result<Option<f64>, FieldErrors> {
        let text = text.trim();
        let value = if text.is_empty() {
            None
        } else {
            Some(text.parse::<f64>().map_err(|_| not_a_number())?)
        };
        self.set_final_value(value)?;
        Ok(value)
    }

    pub fn is_open(&self, which: Comparables) -> bool {
        match which {
            Comparables::Historical => self.historical_open,
            Comparables::Market => self.market_open,
        }
    }

    /// Opens an overlay and returns its read-only rows.
    pub fn open<R: ValuationReader + ?Sized>(
        &mut self,
        repo: &R,
        which: Comparables,
    ) -> RepositoryResult<Vec<ValuationItem>> {
        let items = match which {
            Comparables::Historical => repo.list_comparable_historical()?,
            Comparables::Market => repo.list_comparable_market()?,
        };
        match which {
            Comparables::Historical => self.historical_open = true,
            Comparables::Market => self.market_open = true,
        }
        Ok(items)
    }

    pub fn dismiss(&mut self, which: Comparables) {
        match which {
            Comparables::Historical => self.historical_open = false,
            Comparables::Market => self.market_open = false,
        }
    }

    /// Reference values together with the final value, once one is entered.
    pub fn snapshot(&self) -> Option<ValuationSnapshot> {
        self.final_value.map(|final_value| ValuationSnapshot {
            internal: self.reference.internal,
            external: self.reference.external,
            recommended: self.reference.recommended,
            final_value,
        })
    }
}
