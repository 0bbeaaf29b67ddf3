//! Login screen.

use std::sync::{Arc, Mutex};

use zeroize::Zeroizing;

use super::form::CredentialsForm;
use super::{lock, messages};
use crate::domain::{IdentityGate, Route};

/// Everything the login form renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    /// Field values.
    pub form: CredentialsForm,
    /// Message shown above the submit button.
    pub error: Option<String>,
    /// A submission is in flight.
    pub submitting: bool,
}

/// View model for `/`.
pub struct LoginScreen {
    gate: Arc<IdentityGate>,
    state: Mutex<LoginState>,
}

impl LoginScreen {
    /// Empty form bound to `gate`.
    pub fn new(gate: Arc<IdentityGate>) -> Self {
        Self {
            gate,
            state: Mutex::new(LoginState::default()),
        }
    }

    /// Current form state.
    #[must_use]
    pub fn state(&self) -> LoginState {
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

    /// Link to the sign-up screen.
    #[must_use]
    pub const fn sign_up_route(&self) -> Route {
        Route::SignUp
    }

    /// Link to the password-reset screen.
    #[must_use]
    pub const fn reset_password_route(&self) -> Route {
        Route::ResetPassword
    }

    /// Validate and sign in.
    ///
    /// Returns the route to navigate to on success. On failure the form
    /// keeps its values and shows a message.
    pub async fn submit(&self) -> Option<Route> {
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

        let result = self.gate.sign_in(&credentials).await;

        let mut state = lock(&self.state);
        state.submitting = false;
        match result {
            Ok(()) => Some(Route::Characters),
            Err(_) => {
                state.error = Some(messages::LOGIN_FAILED.to_owned());
                None
            }
        }
    }
}
