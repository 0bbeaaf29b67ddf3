//! User-facing messages rendered by the screens.

/// Login was rejected or failed.
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";

/// Sign-up hit an address that already has an account.
pub const EMAIL_IN_USE: &str = "This email is already in use.";

/// Sign-up failed for any other reason.
pub const SIGN_UP_FAILED: &str = "An error occurred during sign up. Please try again.";

/// The account exists but the verification email did not go out.
pub const VERIFICATION_NOT_SENT: &str =
    "Your account was created, but the verification email could not be sent.";

/// Shown once the verification email is on its way.
pub const CHECK_YOUR_EMAIL: &str = "Please Check Your Email";

/// Password-reset request failed.
pub const RESET_FAILED: &str = "Failed to send reset email. Please try again.";

/// Shown once a reset request was accepted.
pub const RESET_SENT: &str = "Check your inbox for a link to reset your password.";

/// Character listing failed.
pub const LIST_FAILED: &str = "Error fetching characters.";

/// Character detail failed.
pub const CHARACTER_FAILED: &str = "Error fetching character details.";

/// Episode detail or its cast failed.
pub const EPISODE_FAILED: &str = "Error loading episode data.";

/// Location detail or its residents failed.
pub const LOCATION_FAILED: &str = "Error loading location data.";

/// Listing with no matches.
pub const NO_CHARACTERS: &str = "No characters found.";
