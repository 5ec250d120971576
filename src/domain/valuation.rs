//! Comparable items used to value pawned goods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A previously valued device, either from the shop's own pawn history or a
/// scraped market listing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValuationItem {
    pub id: i32,
    pub device_type: String,
    pub manufacturer: String,
    pub model: String,
    pub value: f64,
    pub date: NaiveDate,
}

/// The three reference values displayed next to the operator's final value.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ValuationReference {
    pub internal: f64,
    pub external: f64,
    pub recommended: f64,
}
