//! Service endpoint configuration.

use serde::{Deserialize, Serialize};
use url::Url;

/// Endpoints for the three consumed services.
///
/// All three are required: a terminal without a validation endpoint has
/// nothing to talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Person lookup endpoint (`id_number` is appended as a query pair).
    pub person_lookup_url: Url,

    /// Voucher validation endpoint.
    pub validation_url: Url,

    /// Entry submission endpoint.
    pub entry_url: Url,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_from_json() {
        let config: ServiceConfig = serde_json::from_str(
            r#"{
                "person_lookup_url": "http://sala.local/api/personas",
                "validation_url": "http://sala.local/api/validar",
                "entry_url": "http://sala.local/api/entradas"
            }"#,
        )
        .unwrap();
        assert_eq!(config.validation_url.path(), "/api/validar");
    }

    #[test]
    fn test_rejects_invalid_url() {
        let result: Result<ServiceConfig, _> = serde_json::from_str(
            r#"{
                "person_lookup_url": "not a url",
                "validation_url": "http://sala.local/api/validar",
                "entry_url": "http://sala.local/api/entradas"
            }"#,
        );
        assert!(result.is_err());
    }
}
