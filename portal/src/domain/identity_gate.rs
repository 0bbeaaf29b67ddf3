//! Single source of truth for "who is signed in".
//!
//! The gate turns the provider's push notifications into an observable
//! [`AuthSnapshot`]. It starts in [`AuthPhase::Loading`] and moves to
//! [`AuthPhase::Ready`] on the first notification, never back. Screens and
//! the route guard receive the gate explicitly and read snapshots
//! synchronously; `watch` receivers are available for change-driven
//! consumers.
//!
//! A local sign-out raises a fence: signed-in notifications are ignored
//! until a sign-in started after that sign-out succeeds, so a late
//! notification from an earlier session cannot undo it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::AuthError;
use crate::domain::ports::{
    AuthStateListener, AuthSubscription, IdentityProvider, IdentityProviderError,
    ProviderAccount, TokenCache,
};
use crate::domain::session::{AuthPhase, AuthSnapshot, AuthenticatedUser, Session};
use crate::domain::validation::{Credentials, EmailAddress};

/// Result of a successful sign-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignUpOutcome {
    /// Whether the verification email was handed to the provider.
    ///
    /// A failed send leaves the account in place.
    pub verification_sent: bool,
}

/// Local sign-out bookkeeping shared with the notification listener.
///
/// Snapshot changes that depend on the fence are made while it is locked.
#[derive(Default)]
struct SignOutFence {
    /// Bumped by every local sign-out.
    epoch: u64,
    /// Set while signed-in notifications must be ignored.
    raised: bool,
}

/// Auth-state observable plus the account operations screens call.
pub struct IdentityGate {
    provider: Arc<dyn IdentityProvider>,
    token_cache: Arc<dyn TokenCache>,
    state: Arc<watch::Sender<AuthSnapshot>>,
    fence: Arc<Mutex<SignOutFence>>,
    subscription: Mutex<Option<AuthSubscription>>,
}

impl IdentityGate {
    /// Subscribe to `provider` and return a gate in the loading phase.
    ///
    /// The subscription is held until [`IdentityGate::shutdown`] or drop.
    pub fn start(provider: Arc<dyn IdentityProvider>, token_cache: Arc<dyn TokenCache>) -> Self {
        let (sender, _) = watch::channel(AuthSnapshot::default());
        let state = Arc::new(sender);
        let fence = Arc::new(Mutex::new(SignOutFence::default()));
        let listener = notification_listener(
            Arc::clone(&state),
            Arc::clone(&token_cache),
            Arc::clone(&fence),
        );
        let subscription = provider.subscribe_auth_state(listener);

        Self {
            provider,
            token_cache,
            state,
            fence,
            subscription: Mutex::new(Some(subscription)),
        }
    }

    /// Ask the provider for the initial auth state, resuming the stored
    /// session when there is one.
    ///
    /// The provider's notification moves the gate to the ready phase. A
    /// resumed session's fresh tokens replace the stored ones; a stored
    /// session the provider no longer accepts is forgotten.
    pub async fn restore(&self) {
        let epoch = self.sign_out_epoch();
        let refresh_token = self.token_cache.load().map(|tokens| tokens.refresh_token);
        let had_session = refresh_token.is_some();
        match self.provider.restore_session(refresh_token).await {
            Ok(Some(account)) => {
                if self.admit(epoch, &account) {
                    info!(user_id = %account.user.user_id, "session restored");
                } else {
                    self.discard_stale_session(&account).await;
                }
            }
            Ok(None) => debug!("no stored session to restore"),
            Err(error) => {
                warn!(%error, had_session, "stored session could not be restored");
                self.token_cache.clear();
            }
        }
    }

    /// Current session and phase.
    #[must_use]
    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver that observes every subsequent snapshot change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    /// Return `true` while a token from an earlier sign-in is cached.
    #[must_use]
    pub fn has_cached_token(&self) -> bool {
        self.token_cache.has_token()
    }

    /// Return `true` while the gate is loading and a stored session is
    /// expected to be restored.
    ///
    /// Loading without a stored session usually ends anonymous; this lets a
    /// UI pick what to show meanwhile. Guards still wait for the ready phase.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        let loading = self.state.borrow().phase == AuthPhase::Loading;
        loading && self.has_cached_token()
    }

    /// Return `true` while the provider subscription is held.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Release the provider subscription. Later notifications are ignored.
    pub fn shutdown(&self) {
        let subscription = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(active) = subscription {
            active.unsubscribe();
            info!("identity gate released its provider subscription");
        }
    }

    /// Sign in with validated credentials.
    ///
    /// Success means the provider accepted the credentials. The session is
    /// updated by the notification that follows, which may arrive after this
    /// call returns; navigate on the returned result, not on the snapshot.
    /// After a local sign-out the gate applies the account itself instead.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for rejected credentials and
    /// [`AuthError::Other`] for anything else, including a sign-out that
    /// happened while the request was in flight.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let epoch = self.sign_out_epoch();
        let account = self
            .provider
            .authenticate(credentials)
            .await
            .map_err(|error| {
                warn!(%error, "sign-in rejected");
                AuthError::from(error)
            })?;
        self.admit_or_discard(epoch, &account).await?;
        info!(user_id = %account.user.user_id, "signed in");
        Ok(())
    }

    /// Create an account, then request a verification email for it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailAlreadyInUse`] when the address is taken and
    /// [`AuthError::Other`] for anything else. A failed verification send is
    /// not an error; see [`SignUpOutcome::verification_sent`].
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthError> {
        let epoch = self.sign_out_epoch();
        let account = self
            .provider
            .create_account(credentials)
            .await
            .map_err(|error| {
                warn!(%error, "sign-up rejected");
                AuthError::from(error)
            })?;
        info!(user_id = %account.user.user_id, "account created");
        self.admit_or_discard(epoch, &account).await?;

        let verification_sent = match self.provider.send_verification(&account).await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, user_id = %account.user.user_id, "verification email not sent");
                false
            }
        };
        Ok(SignUpOutcome { verification_sent })
    }

    /// Request a password-reset email.
    ///
    /// Whether an account exists for `email` is never revealed: an unknown
    /// address reports success exactly like a known one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Other`] when the provider rejects the address
    /// format or cannot be reached.
    pub async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), AuthError> {
        match self.provider.send_password_reset(email).await {
            Ok(()) | Err(IdentityProviderError::UserNotFound) => Ok(()),
            Err(error) => {
                warn!(%error, "password reset request failed");
                Err(AuthError::from(error))
            }
        }
    }

    /// Sign out.
    ///
    /// The snapshot switches to an anonymous, ready session and the token
    /// cache is cleared before the provider is contacted, so guards treat the
    /// user as signed out even if the provider's notification lags or the
    /// provider call fails.
    pub async fn sign_out(&self) {
        {
            let mut fence = self.fence();
            fence.epoch += 1;
            fence.raised = true;
            self.state.send_modify(|snapshot| {
                snapshot.session = Session::Anonymous;
                snapshot.phase = AuthPhase::Ready;
            });
        }
        self.token_cache.clear();
        info!("signed out locally");

        if let Err(error) = self.provider.sign_out().await {
            warn!(%error, "provider sign-out failed; local session already cleared");
        }
    }
}

impl IdentityGate {
    fn fence(&self) -> MutexGuard<'_, SignOutFence> {
        lock_fence(&self.fence)
    }

    fn sign_out_epoch(&self) -> u64 {
        self.fence().epoch
    }

    /// Accept `account` for an operation that started at `epoch` and store
    /// its tokens, or return `false` when a sign-out has happened since.
    ///
    /// While the fence is raised the provider's signed-in notification was
    /// ignored, so the account is applied here.
    fn admit(&self, epoch: u64, account: &ProviderAccount) -> bool {
        let mut fence = self.fence();
        if fence.epoch != epoch {
            return false;
        }
        self.token_cache.store(account.cached_tokens());
        if std::mem::take(&mut fence.raised) {
            let user = account.user.clone();
            self.state.send_modify(|snapshot| {
                snapshot.session = Session::Authenticated(user);
                snapshot.phase = AuthPhase::Ready;
            });
        }
        true
    }

    async fn admit_or_discard(&self, epoch: u64, account: &ProviderAccount) -> Result<(), AuthError> {
        if self.admit(epoch, account) {
            return Ok(());
        }
        self.discard_stale_session(account).await;
        Err(AuthError::Other {
            message: "signed out before the sign-in completed".to_owned(),
        })
    }

    /// Undo a provider session that completed after a local sign-out.
    async fn discard_stale_session(&self, account: &ProviderAccount) {
        warn!(user_id = %account.user.user_id, "session completed after sign-out; discarding");
        if let Err(error) = self.provider.sign_out().await {
            warn!(%error, "provider sign-out failed while discarding a stale session");
        }
    }
}

impl Drop for IdentityGate {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn notification_listener(
    state: Arc<watch::Sender<AuthSnapshot>>,
    token_cache: Arc<dyn TokenCache>,
    fence: Arc<Mutex<SignOutFence>>,
) -> AuthStateListener {
    Arc::new(move |user: Option<AuthenticatedUser>| {
        let guard = lock_fence(&fence);
        if user.is_some() && guard.raised {
            debug!("signed-in notification ignored after local sign-out");
            return;
        }
        let session = Session::from(user);
        if !session.is_authenticated() {
            token_cache.clear();
        }
        info!(
            authenticated = session.is_authenticated(),
            "auth state notification applied"
        );
        state.send_modify(|snapshot| {
            snapshot.session = session;
            snapshot.phase = AuthPhase::Ready;
        });
    })
}

fn lock_fence(fence: &Mutex<SignOutFence>) -> MutexGuard<'_, SignOutFence> {
    fence.lock().unwrap_or_else(PoisonError::into_inner)
}
