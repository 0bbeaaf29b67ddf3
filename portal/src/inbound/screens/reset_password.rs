//! Password-reset screen.

use std::sync::{Arc, Mutex};

use super::{lock, messages};
use crate::domain::{EmailAddress, IdentityGate, Route};

/// Everything the reset screen renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPasswordState {
    /// Email field as typed.
    pub email: String,
    /// Message shown above the submit button.
    pub error: Option<String>,
    /// A submission is in flight.
    pub submitting: bool,
    /// The request was accepted; the form is replaced by a notice.
    pub sent: bool,
}

impl ResetPasswordState {
    /// Notice shown once the request was accepted.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        if self.sent {
            Some(messages::RESET_SENT)
        } else {
            None
        }
    }
}

/// View model for `/reset-password`.
pub struct ResetPasswordScreen {
    gate: Arc<IdentityGate>,
    state: Mutex<ResetPasswordState>,
}

impl ResetPasswordScreen {
    /// Empty form bound to `gate`.
    pub fn new(gate: Arc<IdentityGate>) -> Self {
        Self {
            gate,
            state: Mutex::new(ResetPasswordState::default()),
        }
    }

    /// Current screen state.
    #[must_use]
    pub fn state(&self) -> ResetPasswordState {
        lock(&self.state).clone()
    }

    /// Replace the email field.
    pub fn set_email(&self, email: impl Into<String>) {
        lock(&self.state).email = email.into();
    }

    /// Link back to the login screen.
    #[must_use]
    pub const fn login_route(&self) -> Route {
        Route::Login
    }

    /// Validate the address and request a reset email.
    ///
    /// Returns `true` once the request was accepted. Unknown addresses are
    /// accepted like known ones.
    pub async fn submit(&self) -> bool {
        let email = {
            let mut state = lock(&self.state);
            state.error = None;
            match EmailAddress::parse(&state.email) {
                Ok(email) => {
                    state.submitting = true;
                    email
                }
                Err(invalid) => {
                    state.error = Some(invalid.to_string());
                    return false;
                }
            }
        };

        let result = self.gate.request_password_reset(&email).await;

        let mut state = lock(&self.state);
        state.submitting = false;
        match result {
            Ok(()) => {
                state.sent = true;
                true
            }
            Err(_) => {
                state.error = Some(messages::RESET_FAILED.to_owned());
                false
            }
        }
    }
}
