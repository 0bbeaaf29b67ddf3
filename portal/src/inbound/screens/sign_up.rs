//! Sign-up screen.

use std::sync::{Arc, Mutex};

use zeroize::Zeroizing;

use super::form::CredentialsForm;
use super::{lock, messages};
use crate::domain::{AuthError, IdentityGate, Route, SignUpOutcome};

/// Everything the sign-up screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpState {
    /// Field values.
    pub form: CredentialsForm,
    /// Message shown above the submit button.
    pub error: Option<String>,
    /// A submission is in flight.
    pub submitting: bool,
    /// Set once the account exists; the form is replaced by a notice.
    pub completed: Option<SignUpOutcome>,
}

impl SignUpState {
    /// Notice shown after a successful sign-up.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        self.completed.map(|outcome| {
            if outcome.verification_sent {
                messages::CHECK_YOUR_EMAIL
            } else {
                messages::VERIFICATION_NOT_SENT
            }
        })
    }
}

/// View model for `/sign-up`.
pub struct SignUpScreen {
    gate: Arc<IdentityGate>,
    state: Mutex<SignUpState>,
}

impl SignUpScreen {
    /// Empty form bound to `gate`.
    pub fn new(gate: Arc<IdentityGate>) -> Self {
        Self {
            gate,
            state: Mutex::new(SignUpState::default()),
        }
    }

    /// Current screen state.
    #[must_use]
    pub fn state(&self) -> SignUpState {
        lock(&self.state).clone()
    }

    /// Replace the email field.
    pub fn set_email(&self, email: impl Into<String>) {
        lock(&self.state).form.email = email.into();
    }

    /// Replace the password field.
    pub fn set_password(&self, password: impl Into<String>) {
        lock(&self.state).form.password = Zeroizing::new(password.into());
    }

    /// Link back to the login screen.
    #[must_use]
    pub const fn login_route(&self) -> Route {
        Route::Login
    }

    /// Validate, create the account, and request a verification email.
    pub async fn submit(&self) -> Option<SignUpOutcome> {
        let credentials = {
            let mut state = lock(&self.state);
            state.error = None;
            match state.form.credentials() {
                Ok(credentials) => {
                    state.submitting = true;
                    credentials
                }
                Err(invalid) => {
                    state.error = Some(invalid.to_string());
                    return None;
                }
            }
        };

        let result = self.gate.sign_up(&credentials).await;

        let mut state = lock(&self.state);
        state.submitting = false;
        match result {
            Ok(outcome) => {
                state.completed = Some(outcome);
                Some(outcome)
            }
            Err(AuthError::EmailAlreadyInUse) => {
                state.error = Some(messages::EMAIL_IN_USE.to_owned());
                None
            }
            Err(_) => {
                state.error = Some(messages::SIGN_UP_FAILED.to_owned());
                None
            }
        }
    }
}
