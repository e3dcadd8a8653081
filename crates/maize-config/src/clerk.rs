//! Clerk identity-provider configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.clerk.com/v1".to_string()
}

const fn default_verify_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClerkConfig {
    /// Clerk secret key. Used for JWKS lookup and Backend API calls.
    #[serde(default)]
    pub secret_key: String,

    /// Backend API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Upper bound on a single token verification.
    #[serde(default = "default_verify_timeout_ms")]
    pub verify_timeout_ms: u64,
}

impl Default for ClerkConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            api_url: default_api_url(),
            verify_timeout_ms: default_verify_timeout_ms(),
        }
    }
}

impl ClerkConfig {
    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }

    #[must_use]
    pub const fn verify_timeout(&self) -> Duration {
        Duration::from_millis(self.verify_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = ClerkConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.verify_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn configured_when_secret_set() {
        let config = ClerkConfig {
            secret_key: "sk_test_456".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }
}
