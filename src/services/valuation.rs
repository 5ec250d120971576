//! Valuation reference shown next to pawn applications.

use crate::dto::api::ValuationOverview;
use crate::repository::ValuationReader;
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult};

/// Reference values and both comparables lists.
pub fn valuation_overview<R>(repo: &R) -> ServiceResult<ValuationOverview>
where
    R: ValuationReader + ?Sized,
{
    let load = || -> Result<ValuationOverview, RepositoryError> {
        Ok(ValuationOverview {
            internal: repo.internal_valuation()?,
            external: repo.external_valuation()?,
            recommended: repo.recommended_valuation()?,
            historical: repo.list_comparable_historical()?,
            market: repo.list_comparable_market()?,
        })
    };

    load().map_err(|err| {
        log::error!("Failed to load valuation reference: {err}");
        ServiceError::from(err)
    })
}
