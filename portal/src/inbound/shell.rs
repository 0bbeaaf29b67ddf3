//! Application shell.
//!
//! The shell wires the adapters together, owns the identity gate (and with
//! it the provider subscription) for its whole lifetime, and answers
//! navigation requests through the route guard. Screens are created on
//! demand with their collaborators passed in explicitly.
//!
//! A new shell is loading until [`AppShell::restore_session`] has asked the
//! provider for the initial auth state.

use std::sync::Arc;

use tracing::info;

use super::screens::{
    CharacterDetailScreen, CharacterListScreen, EpisodeDetailScreen, LocationDetailScreen,
    LoginScreen, Navigation, ResetPasswordScreen, SignUpScreen,
};
use crate::config::{ConfigError, PortalSettings};
use crate::domain::ports::{CatalogSource, IdentityProvider, TokenCache};
use crate::domain::{AuthSnapshot, CatalogClient, GuardDecision, IdentityGate, Route, guard};
use crate::outbound::catalog::CatalogHttpSource;
use crate::outbound::identity::FirebaseIdentityProvider;
use crate::outbound::token_cache::FileTokenCache;

/// Root object a UI layer holds on to.
pub struct AppShell {
    gate: Arc<IdentityGate>,
    catalog: Arc<CatalogClient>,
    pagination_radius: u32,
}

impl AppShell {
    /// Wire a shell from explicit collaborators and start the gate.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        source: Arc<dyn CatalogSource>,
        token_cache: Arc<dyn TokenCache>,
        pagination_radius: u32,
    ) -> Self {
        Self {
            gate: Arc::new(IdentityGate::start(provider, token_cache)),
            catalog: Arc::new(CatalogClient::new(source)),
            pagination_radius,
        }
    }

    /// Wire the production adapters described by `settings`.
    ///
    /// Session tokens are kept in the configured session file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing identity API key, unparsable
    /// URLs, a zero timeout, an HTTP client that cannot be built, or an
    /// unusable session file.
    pub fn from_settings(settings: &PortalSettings) -> Result<Self, ConfigError> {
        let api_key = settings.identity_api_key()?;
        let timeout = settings.request_timeout()?;
        let source = CatalogHttpSource::new(settings.catalog_base_url()?, timeout)
            .map_err(http_client_error)?;

        let base_url = settings.identity_base_url()?;
        info!(%base_url, "using hosted identity provider");
        let provider = FirebaseIdentityProvider::new(base_url, api_key, timeout)
            .map_err(http_client_error)?
            .with_token_base_url(settings.token_base_url()?);

        let session_file = settings.session_file();
        let token_cache =
            FileTokenCache::open(&session_file).map_err(|error| ConfigError::SessionFile {
                path: error.path.to_string(),
                message: error.message,
            })?;

        Ok(Self::new(
            Arc::new(provider),
            Arc::new(source),
            Arc::new(token_cache),
            settings.pagination_radius(),
        ))
    }

    /// Ask the provider for the initial auth state, resuming the stored
    /// session when there is one, and return the resulting snapshot.
    pub async fn restore_session(&self) -> AuthSnapshot {
        self.gate.restore().await;
        self.gate.snapshot()
    }

    /// Return `true` while loading with a stored session to resume.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        self.gate.is_restoring()
    }

    /// The identity gate.
    #[must_use]
    pub const fn gate(&self) -> &Arc<IdentityGate> {
        &self.gate
    }

    /// The shared catalog client.
    #[must_use]
    pub const fn catalog(&self) -> &Arc<CatalogClient> {
        &self.catalog
    }

    /// Decide what a navigation to `path` shows right now.
    #[must_use]
    pub fn resolve(&self, path: &str) -> GuardDecision {
        guard(&self.gate.snapshot(), &Route::parse(path))
    }

    /// Wait until the provider has reported the initial auth state.
    pub async fn wait_until_ready(&self) -> AuthSnapshot {
        let mut receiver = self.gate.watch();
        receiver
            .wait_for(AuthSnapshot::is_ready)
            .await
            .map_or_else(|_| self.gate.snapshot(), |snapshot| snapshot.clone())
    }

    /// Navigation chrome.
    #[must_use]
    pub fn navigation(&self) -> Navigation {
        Navigation::new(Arc::clone(&self.gate))
    }

    /// Login screen.
    #[must_use]
    pub fn login_screen(&self) -> LoginScreen {
        LoginScreen::new(Arc::clone(&self.gate))
    }

    /// Sign-up screen.
    #[must_use]
    pub fn sign_up_screen(&self) -> SignUpScreen {
        SignUpScreen::new(Arc::clone(&self.gate))
    }

    /// Password-reset screen.
    #[must_use]
    pub fn reset_password_screen(&self) -> ResetPasswordScreen {
        ResetPasswordScreen::new(Arc::clone(&self.gate))
    }

    /// Character listing.
    #[must_use]
    pub fn character_list_screen(&self) -> CharacterListScreen {
        CharacterListScreen::new(Arc::clone(&self.catalog), self.pagination_radius)
    }

    /// Character detail.
    #[must_use]
    pub fn character_detail_screen(&self) -> CharacterDetailScreen {
        CharacterDetailScreen::new(Arc::clone(&self.catalog))
    }

    /// Episode detail.
    #[must_use]
    pub fn episode_detail_screen(&self) -> EpisodeDetailScreen {
        EpisodeDetailScreen::new(Arc::clone(&self.catalog))
    }

    /// Location detail.
    #[must_use]
    pub fn location_detail_screen(&self) -> LocationDetailScreen {
        LocationDetailScreen::new(Arc::clone(&self.catalog))
    }

    /// Release the provider subscription.
    pub fn shutdown(&self) {
        self.gate.shutdown();
    }
}

impl Drop for AppShell {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn http_client_error(error: reqwest::Error) -> ConfigError {
    ConfigError::HttpClient {
        message: error.to_string(),
    }
}
