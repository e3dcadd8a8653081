//! # maize-config
//!
//! Layered configuration loading for MaizeCare using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MAIZECARE_*` prefix, `__` as separator)
//! 2. Project-level `.maizecare/config.toml`
//! 3. User-level `~/.config/maizecare/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MAIZECARE_CLERK__SECRET_KEY` -> `clerk.secret_key`,
//! `MAIZECARE_SERVER__PORT` -> `server.port`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use maize_config::MaizeConfig;
//!
//! let config = MaizeConfig::load_with_dotenv().expect("config");
//! println!("listening on {}", config.server.bind_addr());
//! ```

mod auth;
mod clerk;
mod database;
mod error;
mod general;
mod server;
mod uploads;

pub use auth::AuthConfig;
pub use clerk::ClerkConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::{Environment, GeneralConfig};
pub use server::ServerConfig;
pub use uploads::UploadConfig;

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Prefix of every environment override; nested keys are joined with `__`.
pub const ENV_PREFIX: &str = "MAIZECARE_";

/// Project-local config file, relative to the working directory.
const LOCAL_CONFIG: &str = ".maizecare/config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MaizeConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub clerk: ClerkConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl MaizeConfig {
    /// Defaults, discovered TOML files, then `MAIZECARE_*` variables.
    ///
    /// No `.env` handling; see [`Self::load_with_dotenv`].
    ///
    /// # Errors
    ///
    /// `ConfigError::Load` when a source cannot be extracted,
    /// `ConfigError::Invalid` when a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// [`Self::load`] after reading the nearest `.env` into the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::load()
    }

    /// Like [`Self::load_with_dotenv`] with `path` layered over the discovered
    /// files. Environment variables still win.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        load_dotenv();
        Self::extract(Self::layered(Some(path)))
    }

    /// The provider chain used by [`Self::load`], exposed for tests.
    #[must_use]
    pub fn figment() -> Figment {
        Self::layered(None)
    }

    fn layered(explicit: Option<&Path>) -> Figment {
        let files = [global_config_path(), Some(PathBuf::from(LOCAL_CONFIG))]
            .into_iter()
            .flatten()
            .filter(|path| path.exists())
            .chain(explicit.map(Path::to_path_buf));

        files
            .fold(
                Figment::from(Serialized::defaults(Self::default())),
                |figment, path| figment.merge(Toml::file(path)),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Whether the raw development header may be used to authenticate.
    #[must_use]
    pub fn dev_header_enabled(&self) -> bool {
        self.auth.allow_dev_header && !self.general.is_production()
    }

    /// Reject values that would only fail later at bind or request time.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if self.server.port == 0 {
            return invalid("server.port", "must be non-zero");
        }
        if self.uploads.max_bytes == 0 {
            return invalid("uploads.max_bytes", "must be non-zero");
        }
        let header = self.auth.dev_header.as_str();
        let is_token = !header.is_empty()
            && header
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !is_token {
            return invalid(
                "auth.dev_header",
                &format!("{header:?} is not a valid header name"),
            );
        }
        Ok(())
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("maizecare").join("config.toml"))
}

/// Read the first `.env` found walking up from the crate manifest (during
/// `cargo run`) or from the working directory. A missing file is not an error.
fn load_dotenv() {
    let from_manifest = std::env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .and_then(|start| {
            start
                .ancestors()
                .take(3)
                .map(|dir| dir.join(".env"))
                .find(|candidate| candidate.exists())
        });

    let _ = match from_manifest {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(drop),
    };
}
