//! Headless screens.
//!
//! Each screen owns the state a UI renders and exposes user actions as
//! methods. State sits behind a mutex so actions can overlap; readers take a
//! snapshot with `state()`. Collaborators are passed in explicitly.

use std::sync::{Mutex, MutexGuard, PoisonError};

mod character_list;
mod detail;
mod form;
mod login;
pub mod messages;
mod navigation;
mod reset_password;
mod sign_up;

pub use character_list::{CharacterListScreen, CharacterListState};
pub use detail::{
    CharacterDetailScreen, CharacterView, DetailState, EpisodeDetailScreen, EpisodeView,
    LocationDetailScreen, LocationView,
};
pub use form::CredentialsForm;
pub use login::{LoginScreen, LoginState};
pub use navigation::Navigation;
pub use reset_password::{ResetPasswordScreen, ResetPasswordState};
pub use sign_up::{SignUpScreen, SignUpState};

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
