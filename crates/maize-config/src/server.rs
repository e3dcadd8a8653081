//! HTTP listener configuration.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

fn default_api_version() -> String {
    "v1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address. All interfaces by default so devices on the LAN can reach it.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Routes are mounted under `/api/{api_version}`.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_version: default_api_version(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.api_version.trim_matches('/'))
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
