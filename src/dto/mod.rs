//! DTOs that bridge services with the JSON API and the wizard host.

pub mod api;
pub mod dashboard;
pub mod wizard;
