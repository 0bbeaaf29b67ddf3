//! In-memory identity provider for local runs and tests.
//!
//! Accounts live in a map keyed by email address. Outgoing emails are not
//! sent; they are appended to an outbox that callers can inspect. Every
//! issued refresh token stays valid for the provider's lifetime, so a new
//! gate over the same provider can resume a stored session.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::info;
use zeroize::Zeroizing;

use super::broadcaster::AuthStateBroadcaster;
use crate::domain::ports::{
    AuthStateListener, AuthSubscription, IdentityProvider, IdentityProviderError,
    ProviderAccount,
};
use crate::domain::{AuthenticatedUser, Credentials, EmailAddress, UserId};

/// Kind of email the fixture provider pretends to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxKind {
    /// Password-reset link.
    PasswordReset,
    /// Address-verification link.
    Verification,
}

/// One email recorded by the fixture provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboxEntry {
    /// What the email was for.
    pub kind: OutboxKind,
    /// Recipient.
    pub email: String,
}

struct StoredAccount {
    user_id: UserId,
    password: Zeroizing<String>,
    email_verified: bool,
}

impl StoredAccount {
    fn duplicate(&self) -> Self {
        Self {
            user_id: self.user_id.clone(),
            password: self.password.clone(),
            email_verified: self.email_verified,
        }
    }
}

#[derive(Default)]
struct Directory {
    accounts: HashMap<String, StoredAccount>,
    outbox: Vec<OutboxEntry>,
    issued_tokens: u64,
    refresh_tokens: HashMap<String, String>,
}

/// Identity provider that keeps every account in memory.
#[derive(Default)]
pub struct FixtureIdentityProvider {
    directory: Mutex<Directory>,
    broadcaster: AuthStateBroadcaster,
}

impl FixtureIdentityProvider {
    /// Provider with no accounts, already primed as signed out.
    #[must_use]
    pub fn new() -> Self {
        let provider = Self::default();
        provider.broadcaster.publish(None);
        provider
    }

    /// Provider that has not determined its initial state yet.
    ///
    /// Listeners wait until [`IdentityProvider::restore_session`] runs.
    #[must_use]
    pub fn unprimed() -> Self {
        Self::default()
    }

    /// Emails recorded so far, oldest first.
    #[must_use]
    pub fn outbox(&self) -> Vec<OutboxEntry> {
        self.directory().outbox.clone()
    }

    /// Number of listeners currently subscribed.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.broadcaster.listener_count()
    }

    fn directory(&self) -> MutexGuard<'_, Directory> {
        self.directory.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue(directory: &mut Directory, email: &str, account: &StoredAccount) -> ProviderAccount {
        directory.issued_tokens += 1;
        let serial = directory.issued_tokens;
        let refresh_token = format!("fixture-refresh-{serial}");
        directory
            .refresh_tokens
            .insert(refresh_token.clone(), email.to_owned());
        ProviderAccount {
            user: AuthenticatedUser {
                user_id: account.user_id.clone(),
                email: email.to_owned(),
                email_verified: account.email_verified,
            },
            id_token: Zeroizing::new(format!("fixture-token-{serial}")),
            refresh_token: Zeroizing::new(refresh_token),
        }
    }

    fn resume(&self, refresh_token: &str) -> Result<ProviderAccount, IdentityProviderError> {
        let mut directory = self.directory();
        let email = directory
            .refresh_tokens
            .get(refresh_token)
            .cloned()
            .ok_or_else(|| IdentityProviderError::rejected("INVALID_REFRESH_TOKEN"))?;
        let stored = directory
            .accounts
            .get(&email)
            .map(StoredAccount::duplicate)
            .ok_or_else(IdentityProviderError::user_not_found)?;
        Ok(Self::issue(&mut directory, &email, &stored))
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn create_account(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderAccount, IdentityProviderError> {
        let email = credentials.email().as_str().to_owned();
        let account = {
            let mut directory = self.directory();
            if directory.accounts.contains_key(&email) {
                return Err(IdentityProviderError::email_already_in_use());
            }
            let user_id = UserId::new(format!("fixture-{}", directory.accounts.len() + 1))
                .map_err(|error| IdentityProviderError::rejected(error.to_string()))?;
            let stored = StoredAccount {
                user_id,
                password: Zeroizing::new(credentials.password().to_owned()),
                email_verified: false,
            };
            let account = Self::issue(&mut directory, &email, &stored);
            directory.accounts.insert(email, stored);
            account
        };
        info!(user_id = %account.user.user_id, "fixture account created");
        self.broadcaster.publish(Some(account.user.clone()));
        Ok(account)
    }

    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderAccount, IdentityProviderError> {
        let email = credentials.email().as_str();
        let account = {
            let mut directory = self.directory();
            let matched = directory
                .accounts
                .get(email)
                .filter(|stored| stored.password.as_str() == credentials.password())
                .map(StoredAccount::duplicate)
                .ok_or_else(IdentityProviderError::invalid_credentials)?;
            Self::issue(&mut directory, email, &matched)
        };
        self.broadcaster.publish(Some(account.user.clone()));
        Ok(account)
    }

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), IdentityProviderError> {
        let mut directory = self.directory();
        if !directory.accounts.contains_key(email.as_str()) {
            return Err(IdentityProviderError::user_not_found());
        }
        directory.outbox.push(OutboxEntry {
            kind: OutboxKind::PasswordReset,
            email: email.as_str().to_owned(),
        });
        Ok(())
    }

    async fn send_verification(
        &self,
        account: &ProviderAccount,
    ) -> Result<(), IdentityProviderError> {
        let mut directory = self.directory();
        directory.outbox.push(OutboxEntry {
            kind: OutboxKind::Verification,
            email: account.user.email.clone(),
        });
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        self.broadcaster.publish(None);
        Ok(())
    }

    async fn restore_session(
        &self,
        refresh_token: Option<Zeroizing<String>>,
    ) -> Result<Option<ProviderAccount>, IdentityProviderError> {
        let Some(refresh_token) = refresh_token else {
            self.broadcaster.publish(None);
            return Ok(None);
        };
        match self.resume(&refresh_token) {
            Ok(account) => {
                info!(user_id = %account.user.user_id, "fixture session resumed");
                self.broadcaster.publish(Some(account.user.clone()));
                Ok(Some(account))
            }
            Err(error) => {
                self.broadcaster.publish(None);
                Err(error)
            }
        }
    }

    fn subscribe_auth_state(&self, listener: AuthStateListener) -> AuthSubscription {
        self.broadcaster.subscribe(listener)
    }
}
