//! Loan and loan application aggregates.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, LoanId, SanitizedText, TypeConstraintError};

/// Product line a loan belongs to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoanType {
    Pawn,
    Consumer,
    Retail,
}

impl LoanType {
    pub const ALL: [LoanType; 3] = [LoanType::Pawn, LoanType::Consumer, LoanType::Retail];

    pub const fn as_str(self) -> &'static str {
        match self {
            LoanType::Pawn => "pawn",
            LoanType::Consumer => "consumer",
            LoanType::Retail => "retail",
        }
    }
}

impl Display for LoanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pawn" => Ok(LoanType::Pawn),
            "consumer" => Ok(LoanType::Consumer),
            "retail" => Ok(LoanType::Retail),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown loan type `{other}`"
            ))),
        }
    }
}

/// Review and servicing state of a loan.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Active,
    Closed,
}

impl LoanStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Active => "active",
            LoanStatus::Closed => "closed",
        }
    }

    /// Whether the workflow allows moving from `self` to `next`.
    pub const fn can_transition_to(self, next: LoanStatus) -> bool {
        matches!(
            (self, next),
            (LoanStatus::Pending, LoanStatus::Approved)
                | (LoanStatus::Pending, LoanStatus::Rejected)
                | (LoanStatus::Approved, LoanStatus::Active)
                | (LoanStatus::Active, LoanStatus::Closed)
        )
    }
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(LoanStatus::Pending),
            "approved" => Ok(LoanStatus::Approved),
            "rejected" => Ok(LoanStatus::Rejected),
            "active" => Ok(LoanStatus::Active),
            "closed" => Ok(LoanStatus::Closed),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown loan status `{other}`"
            ))),
        }
    }
}

/// Structured attributes of the pawned device.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceDetails {
    pub device_type: String,
    pub manufacturer: String,
    pub model: String,
    pub color: String,
    pub screen_size: Option<String>,
    pub ram: Option<String>,
    pub camera: Option<String>,
    pub sim_cards: Option<String>,
    pub storage: Option<String>,
}

/// Accessories handed over together with the item.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Accessories {
    pub has_charger: bool,
    pub has_other_accessories: bool,
    /// Present only when `has_other_accessories` is set.
    pub description: Option<String>,
}

/// Reference values and the operator decision captured at submission.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValuationSnapshot {
    pub internal: f64,
    pub external: f64,
    pub recommended: f64,
    #[serde(rename = "final")]
    pub final_value: f64,
}

/// Pawn-specific part of a loan.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PawnDetails {
    pub item_details: SanitizedText,
    pub device: DeviceDetails,
    pub accessories: Accessories,
    pub valuation: ValuationSnapshot,
}

/// Photograph of a pawned item stored with the loan.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoanImage {
    pub file_name: String,
    pub content_type: String,
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Loan {
    pub id: LoanId,
    pub client_id: Option<ClientId>,
    pub loan_type: LoanType,
    pub amount: f64,
    pub status: LoanStatus,
    pub interest_rate: f64,
    /// Duration in months.
    pub term: i32,
    pub purpose: Option<String>,
    pub collateral: Option<String>,
    pub pawn: Option<PawnDetails>,
    pub images: Vec<LoanImage>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Fully assembled loan record handed to the loan registry for creation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewLoan {
    pub client_id: Option<ClientId>,
    pub loan_type: LoanType,
    pub amount: f64,
    pub status: LoanStatus,
    pub interest_rate: f64,
    pub term: i32,
    pub purpose: Option<String>,
    pub collateral: Option<String>,
    pub pawn: Option<PawnDetails>,
    pub images: Vec<LoanImage>,
}

/// Editable terms of a pending loan.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UpdateLoan {
    pub amount: f64,
    pub interest_rate: f64,
    pub term: i32,
    pub purpose: Option<String>,
    pub collateral: Option<String>,
}

/// Fixed terms applied to every pawn application.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PawnTerms {
    /// Duration in months.
    pub term: i32,
    pub interest_rate: f64,
}

impl Default for PawnTerms {
    fn default() -> Self {
        Self {
            term: 12,
            interest_rate: 5.0,
        }
    }
}
