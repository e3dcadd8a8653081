//! Identity-resolution settings.

use serde::{Deserialize, Serialize};

const fn default_allow_dev_header() -> bool {
    true
}

fn default_dev_header() -> String {
    "x-user-id".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Accept the raw development header when no `Authorization` header is sent.
    /// Ignored when `general.environment` is `production`.
    #[serde(default = "default_allow_dev_header")]
    pub allow_dev_header: bool,

    /// Name of the development header.
    #[serde(default = "default_dev_header")]
    pub dev_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_dev_header: default_allow_dev_header(),
            dev_header: default_dev_header(),
        }
    }
}
