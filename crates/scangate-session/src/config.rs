//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use scangate_core::constants::DEFAULT_IDLE_TIMEOUT_MS;

/// Tunables for one scan session.
///
/// Deserialized from the application config file; every field has a default
/// so an empty table works.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inactivity gap in milliseconds that completes a scan burst.
    pub idle_timeout_ms: u64,

    /// Where the operator is routed when the lookup fails.
    pub register_redirect: String,
}

impl SessionConfig {
    /// The idle gap as a `Duration`.
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            register_redirect: "/registrar/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.idle_timeout(), Duration::from_millis(100));
        assert_eq!(config.register_redirect, "/registrar/");
    }

    #[test]
    fn test_empty_table_deserializes_to_defaults() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.idle_timeout_ms, 100);
    }

    #[test]
    fn test_overrides() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"idle_timeout_ms": 150, "register_redirect": "/alta/"}"#)
                .unwrap();
        assert_eq!(config.idle_timeout(), Duration::from_millis(150));
        assert_eq!(config.register_redirect, "/alta/");
    }
}
