//! Email/password input shared by the login and sign-up screens.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{Credentials, ValidationError};

/// Raw form input, kept verbatim across failed submissions.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialsForm {
    /// Email field as typed.
    pub email: String,
    /// Password field as typed.
    pub password: Zeroizing<String>,
}

impl CredentialsForm {
    /// Validate the fields without clearing them.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`]; the email is checked first.
    pub fn credentials(&self) -> Result<Credentials, ValidationError> {
        Credentials::try_from_parts(&self.email, &self.password)
    }
}

impl fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
