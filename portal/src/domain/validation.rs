//! Credential format checks run before anything reaches the identity
//! provider.
//!
//! Keep form parsing outside the gate by exposing constructors that validate
//! raw strings before a screen talks to a port or service.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use zeroize::Zeroizing;

/// Minimum password length in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Punctuation a password must draw at least one character from.
pub const PASSWORD_SPECIAL_CHARACTERS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal covered by the validation tests"
)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Return `true` when `candidate` has the shape `local@domain.tld`.
///
/// Only the shape is checked: no whitespace, exactly one `@`, and a `.`
/// followed by at least one character somewhere after the `@`.
///
/// # Examples
/// ```
/// use portal::domain::validation::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(!is_valid_email("user@example"));
/// assert!(!is_valid_email("user example@mail.com"));
/// ```
#[must_use]
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate)
}

/// Return `true` when `candidate` satisfies the password policy.
///
/// The policy is a closed alphabet: every character must be an ASCII letter,
/// an ASCII digit, or one of [`PASSWORD_SPECIAL_CHARACTERS`]. On top of that
/// the password needs at least [`PASSWORD_MIN_LENGTH`] characters, one
/// uppercase letter, one digit, and one special character.
///
/// # Examples
/// ```
/// use portal::domain::validation::is_valid_password;
///
/// assert!(is_valid_password("Abcdef1!"));
/// assert!(!is_valid_password("abcdefg1!"));
/// assert!(!is_valid_password("Abcdef1!#"));
/// ```
#[must_use]
pub fn is_valid_password(candidate: &str) -> bool {
    if candidate.chars().count() < PASSWORD_MIN_LENGTH {
        return false;
    }
    if !candidate.chars().all(is_password_char) {
        return false;
    }

    let has_upper = candidate.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
    let has_special = candidate.chars().any(is_special_char);
    has_upper && has_digit && has_special
}

fn is_password_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_special_char(c)
}

fn is_special_char(c: char) -> bool {
    PASSWORD_SPECIAL_CHARACTERS.contains(&c)
}

/// Local validation failures. These never reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The email address is not shaped like `local@domain.tld`.
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    /// The password breaks the password policy.
    #[error(
        "Password must be at least 8 characters, with one uppercase letter, one number, and one special character."
    )]
    WeakPassword,
}

/// Email address that passed [`is_valid_email`].
///
/// ## Invariants
/// - Surrounding whitespace is trimmed before validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate a raw email address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] when the trimmed value is not
    /// a plausible address.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim();
        if !is_valid_email(normalized) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated sign-in or sign-up credentials.
///
/// ## Invariants
/// - `email` satisfies [`is_valid_email`] after trimming.
/// - `password` satisfies [`is_valid_password`] and is kept verbatim; it is
///   wiped from memory when dropped.
///
/// # Examples
/// ```
/// use portal::domain::validation::Credentials;
///
/// let creds = Credentials::try_from_parts(" morty@citadel.test ", "Portal9!").unwrap();
/// assert_eq!(creds.email().as_str(), "morty@citadel.test");
/// assert_eq!(creds.password(), "Portal9!");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Validate raw email/password form input.
    ///
    /// The email is checked first so a form with both fields wrong reports
    /// the email problem.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = EmailAddress::parse(email)?;
        if !is_valid_password(password) {
            return Err(ValidationError::WeakPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Validated email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the user.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
