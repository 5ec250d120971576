//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::domain::loan::PawnTerms;
use crate::repository::valuation::ComparablesCatalog;

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Term and rate applied to every pawn application.
    #[serde(default)]
    pub pawn_terms: PawnTerms,
    /// Comparable items backing the valuation panel.
    #[serde(default)]
    pub valuation: ComparablesCatalog,
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use config::{Config, File};

    use super::*;
    use crate::repository::ValuationReader;

    #[test]
    fn default_profile_loads() {
        let server_config: ServerConfig = Config::builder()
            .add_source(File::with_name("config/default"))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(server_config.port, 8080);
        assert_eq!(server_config.pawn_terms, PawnTerms::default());
        assert_eq!(server_config.valuation, ComparablesCatalog::default());
        assert_eq!(
            server_config.valuation.recommended_valuation().unwrap(),
            450.0
        );
    }

    #[test]
    fn pawn_terms_and_catalog_fall_back_to_defaults() {
        let server_config: ServerConfig = serde_json::from_value(serde_json::json!({
            "address": "0.0.0.0",
            "port": 9000,
            "database_url": "pawn.db"
        }))
        .unwrap();

        assert_eq!(server_config.pawn_terms.term, 12);
        assert_eq!(server_config.valuation.historical.len(), 2);
    }
}
