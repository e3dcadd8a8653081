//! Shared application state.

use std::sync::Arc;

use anyhow::Context;
use maize_auth::{
    ClerkProvider, IdentityProvider, IdentityResolver, ResolverSettings, UnconfiguredProvider,
};
use maize_config::MaizeConfig;
use maize_db::MaizeService;

use crate::classifier::{Classifier, RandomClassifier};
use crate::directory::DbDirectory;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MaizeConfig>,
    pub db: Arc<MaizeService>,
    pub resolver: IdentityResolver,
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    /// Wire the resolver to `provider` and a directory over `db`.
    #[must_use]
    pub fn new(
        config: MaizeConfig,
        db: Arc<MaizeService>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let settings = ResolverSettings {
            dev_header_enabled: config.dev_header_enabled(),
            verify_timeout: config.clerk.verify_timeout(),
        };
        let directory = Arc::new(DbDirectory::new(Arc::clone(&db)));
        Self {
            resolver: IdentityResolver::new(provider, directory, settings),
            config: Arc::new(config),
            db,
            classifier: Arc::new(RandomClassifier),
        }
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Open the configured database and identity provider.
    ///
    /// # Errors
    ///
    /// Fails if the database cannot be opened or the Clerk client cannot be
    /// built.
    pub async fn from_config(config: MaizeConfig) -> anyhow::Result<Self> {
        let db = MaizeService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        let provider = identity_provider(&config)?;
        Ok(Self::new(config, Arc::new(db), provider))
    }
}

/// Clerk when a secret key is configured, otherwise a provider that reports
/// itself unavailable.
///
/// # Errors
///
/// Fails if the Clerk client cannot be constructed.
pub fn identity_provider(config: &MaizeConfig) -> anyhow::Result<Arc<dyn IdentityProvider>> {
    if config.clerk.is_configured() {
        let provider = ClerkProvider::new(
            &config.clerk.secret_key,
            &config.clerk.api_url,
            config.clerk.verify_timeout(),
        )
        .context("failed to build Clerk client")?;
        Ok(Arc::new(provider))
    } else {
        tracing::warn!("clerk.secret_key is not set; bearer authentication is unavailable");
        Ok(Arc::new(UnconfiguredProvider))
    }
}
