//! Driven port for the hosted identity provider.
//!
//! The provider owns accounts, passwords, and outgoing emails. The
//! application only asks it to act and listens for the auth-state
//! notifications it pushes back.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use zeroize::Zeroizing;

use super::define_port_error;
use super::token_cache::CachedTokens;
use crate::domain::session::AuthenticatedUser;
use crate::domain::validation::{Credentials, EmailAddress};

/// Account handle returned by sign-up and sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderAccount {
    /// The signed-in user.
    pub user: AuthenticatedUser,
    /// Short-lived id token proving the sign-in.
    pub id_token: Zeroizing<String>,
    /// Long-lived token used to restore the session later.
    pub refresh_token: Zeroizing<String>,
}

impl ProviderAccount {
    /// Tokens to keep for restoring this session.
    #[must_use]
    pub fn cached_tokens(&self) -> CachedTokens {
        CachedTokens {
            id_token: self.id_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

impl fmt::Debug for ProviderAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderAccount")
            .field("user", &self.user)
            .field("id_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

define_port_error! {
    /// Errors surfaced by the identity provider.
    pub enum IdentityProviderError {
        /// Email/password pair did not match an active account.
        InvalidCredentials => "identity provider rejected the credentials",
        /// An account already exists for the address.
        EmailAlreadyInUse => "identity provider reports the email is already registered",
        /// No account exists for the address.
        UserNotFound => "identity provider has no account for the address",
        /// The provider considers the address malformed.
        InvalidEmail => "identity provider rejected the email address format",
        /// Any other refusal reported by the provider.
        Rejected { message: String } => "identity provider refused the request: {message}",
        /// The provider could not be reached or answered unintelligibly.
        Transport { message: String } => "identity provider unreachable: {message}",
    }
}

/// Callback invoked with the signed-in user, or `None` once signed out.
pub type AuthStateListener = Arc<dyn Fn(Option<AuthenticatedUser>) + Send + Sync>;

/// Scoped registration of an [`AuthStateListener`].
///
/// The listener stays registered until the subscription is dropped or
/// [`AuthSubscription::unsubscribe`] is called, whichever comes first.
#[must_use = "dropping the subscription unregisters the listener immediately"]
pub struct AuthSubscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl AuthSubscription {
    /// Wrap the provider-specific release action.
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Unregister the listener now.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for AuthSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSubscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Port for account management and auth-state notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new email/password account and sign it in.
    async fn create_account(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderAccount, IdentityProviderError>;

    /// Sign in an existing account.
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderAccount, IdentityProviderError>;

    /// Ask the provider to email a password-reset link.
    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), IdentityProviderError>;

    /// Ask the provider to email an address-verification link.
    async fn send_verification(
        &self,
        account: &ProviderAccount,
    ) -> Result<(), IdentityProviderError>;

    /// End the provider-side session.
    async fn sign_out(&self) -> Result<(), IdentityProviderError>;

    /// Determine the initial auth state, resuming the session behind
    /// `refresh_token` when one was stored.
    ///
    /// Listeners are always notified before this returns: with the restored
    /// user on success, and signed out when there is nothing to restore or
    /// the stored session is no longer valid.
    async fn restore_session(
        &self,
        refresh_token: Option<Zeroizing<String>>,
    ) -> Result<Option<ProviderAccount>, IdentityProviderError>;

    /// Register `listener` for auth-state notifications.
    ///
    /// Once the provider knows the initial state it delivers it to new
    /// listeners straight away, then every subsequent change in order.
    fn subscribe_auth_state(&self, listener: AuthStateListener) -> AuthSubscription;
}
