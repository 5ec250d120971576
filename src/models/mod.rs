//! Database models and configuration shared across the repository layer.

pub mod client;
pub mod config;
pub mod loan;
