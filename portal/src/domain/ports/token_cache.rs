//! Driven port for the local session-token store.
//!
//! The store keeps the tokens of the last sign-in so a later launch can
//! restore the session through the identity provider. While the gate is
//! loading, a stored token also lets the shell tell "restoring a session"
//! from "definitely anonymous". Route decisions never rely on it.

use std::fmt;

use zeroize::Zeroizing;

/// Tokens issued by the identity provider for one signed-in session.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedTokens {
    /// Short-lived id token.
    pub id_token: Zeroizing<String>,
    /// Long-lived token exchanged for fresh id tokens on restore.
    pub refresh_token: Zeroizing<String>,
}

impl CachedTokens {
    /// Pair an id token with its refresh token.
    pub fn new(id_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            id_token: Zeroizing::new(id_token.into()),
            refresh_token: Zeroizing::new(refresh_token.into()),
        }
    }
}

impl fmt::Debug for CachedTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedTokens")
            .field("id_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Holds at most one session's tokens.
///
/// Implementations never fail loudly: storage errors are logged and the
/// in-process copy stays authoritative for the current run.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCache: Send + Sync {
    /// Tokens stored by an earlier sign-in, if any.
    fn load(&self) -> Option<CachedTokens>;

    /// Replace the stored tokens.
    fn store(&self, tokens: CachedTokens);

    /// Forget the stored tokens.
    fn clear(&self);

    /// Return `true` when tokens are stored.
    fn has_token(&self) -> bool;
}
