//! Domain aggregates exposed by the pawn desk service layer.

pub mod client;
pub mod loan;
pub mod types;
pub mod valuation;
