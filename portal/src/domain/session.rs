//! Authentication state as seen by the rest of the application.

use std::fmt;

use thiserror::Error;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserIdValidationError {
    /// The provider handed back an empty identifier.
    #[error("user id must not be empty")]
    Empty,
    /// The identifier carries leading or trailing whitespace.
    #[error("user id must not contain surrounding whitespace")]
    ContainsWhitespace,
}

/// Opaque user identifier assigned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Errors
    ///
    /// Returns [`UserIdValidationError`] for blank or padded identifiers.
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let raw = id.into();
        if raw.trim().is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(UserIdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in user details carried by [`Session::Authenticated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Provider-assigned identifier.
    pub user_id: UserId,
    /// Email address the account was registered with.
    pub email: String,
    /// Whether the address has been confirmed through the verification email.
    pub email_verified: bool,
}

/// Authentication state of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Nobody is signed in.
    #[default]
    Anonymous,
    /// A user is signed in.
    Authenticated(AuthenticatedUser),
}

impl Session {
    /// Return `true` for [`Session::Authenticated`].
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Anonymous => None,
        }
    }
}

impl From<Option<AuthenticatedUser>> for Session {
    fn from(value: Option<AuthenticatedUser>) -> Self {
        value.map_or(Self::Anonymous, Self::Authenticated)
    }
}

/// Whether the provider has reported the initial auth state yet.
///
/// The phase only ever moves from `Loading` to `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    /// Waiting for the provider's first notification.
    #[default]
    Loading,
    /// At least one notification has been applied.
    Ready,
}

/// Point-in-time view of the identity gate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthSnapshot {
    /// Current session.
    pub session: Session,
    /// Current phase.
    pub phase: AuthPhase,
}

impl AuthSnapshot {
    /// Snapshot for a ready gate with `session`.
    #[must_use]
    pub const fn ready(session: Session) -> Self {
        Self {
            session,
            phase: AuthPhase::Ready,
        }
    }

    /// Return `true` once the gate has left the loading phase.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.phase, AuthPhase::Ready)
    }
}
