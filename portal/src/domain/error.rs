//! Domain-level error types.
//!
//! These errors are presentation agnostic. Screens map them to the messages
//! they render; nothing here is fatal to the application.

use thiserror::Error;

use crate::domain::ports::IdentityProviderError;

/// Failures of the account operations exposed by the identity gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The email/password pair was not accepted.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Sign-up hit an address that already has an account.
    #[error("email address is already registered")]
    EmailAlreadyInUse,
    /// Anything else, including transport failures.
    #[error("authentication request failed: {message}")]
    Other {
        /// Description of the underlying failure.
        message: String,
    },
}

impl From<IdentityProviderError> for AuthError {
    fn from(value: IdentityProviderError) -> Self {
        match value {
            // Unknown users surface as bad credentials.
            IdentityProviderError::InvalidCredentials | IdentityProviderError::UserNotFound => {
                Self::InvalidCredentials
            }
            IdentityProviderError::EmailAlreadyInUse => Self::EmailAlreadyInUse,
            other @ (IdentityProviderError::InvalidEmail
            | IdentityProviderError::Rejected { .. }
            | IdentityProviderError::Transport { .. }) => Self::Other {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(IdentityProviderError::invalid_credentials(), AuthError::InvalidCredentials)]
    #[case(IdentityProviderError::user_not_found(), AuthError::InvalidCredentials)]
    #[case(IdentityProviderError::email_already_in_use(), AuthError::EmailAlreadyInUse)]
    fn provider_errors_map_to_specific_kinds(
        #[case] source: IdentityProviderError,
        #[case] expected: AuthError,
    ) {
        assert_eq!(AuthError::from(source), expected);
    }

    #[rstest]
    #[case(IdentityProviderError::invalid_email())]
    #[case(IdentityProviderError::rejected("USER_DISABLED"))]
    #[case(IdentityProviderError::transport("connection reset"))]
    fn remaining_provider_errors_map_to_other(#[case] source: IdentityProviderError) {
        let message = source.to_string();
        assert_eq!(AuthError::from(source), AuthError::Other { message });
    }
}
