//! Request and response bodies for the Identity Toolkit REST API.

use serde::{Deserialize, Serialize};

use crate::domain::ports::IdentityProviderError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PasswordRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TokenResponseDto {
    pub(super) id_token: String,
    pub(super) local_id: String,
    #[serde(default)]
    pub(super) email: String,
    #[serde(default)]
    pub(super) refresh_token: String,
}

/// Form body for the secure-token exchange.
#[derive(Serialize)]
pub(super) struct RefreshRequestDto<'a> {
    pub(super) grant_type: &'static str,
    pub(super) refresh_token: &'a str,
}

/// The secure-token endpoint answers in `snake_case`.
#[derive(Debug, Deserialize)]
pub(super) struct RefreshResponseDto {
    pub(super) id_token: String,
    pub(super) refresh_token: String,
    pub(super) user_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct OobCodeRequestDto<'a> {
    pub(super) request_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) id_token: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupRequestDto<'a> {
    pub(super) id_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LookupResponseDto {
    #[serde(default)]
    pub(super) users: Vec<LookupUserDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupUserDto {
    #[serde(default)]
    pub(super) email: String,
    #[serde(default)]
    pub(super) email_verified: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    pub(super) error: ErrorBodyDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: String,
}

impl ErrorBodyDto {
    /// Leading error code, e.g. `WEAK_PASSWORD` in
    /// `WEAK_PASSWORD : Password should be at least 6 characters`.
    pub(super) fn code(&self) -> &str {
        self.message
            .split(':')
            .next()
            .map_or("", str::trim)
    }

    pub(super) fn into_port_error(self) -> IdentityProviderError {
        match self.code() {
            "EMAIL_EXISTS" => IdentityProviderError::email_already_in_use(),
            "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                IdentityProviderError::invalid_credentials()
            }
            "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => IdentityProviderError::user_not_found(),
            "INVALID_EMAIL" | "MISSING_EMAIL" => IdentityProviderError::invalid_email(),
            _ => IdentityProviderError::rejected(self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn error_body(message: &str) -> ErrorBodyDto {
        ErrorBodyDto {
            message: message.to_owned(),
        }
    }

    #[rstest]
    #[case("EMAIL_EXISTS", IdentityProviderError::email_already_in_use())]
    #[case("INVALID_PASSWORD", IdentityProviderError::invalid_credentials())]
    #[case("INVALID_LOGIN_CREDENTIALS", IdentityProviderError::invalid_credentials())]
    #[case("EMAIL_NOT_FOUND", IdentityProviderError::user_not_found())]
    #[case("INVALID_EMAIL", IdentityProviderError::invalid_email())]
    fn known_codes_map_to_specific_errors(
        #[case] message: &str,
        #[case] expected: IdentityProviderError,
    ) {
        assert_eq!(error_body(message).into_port_error(), expected);
    }

    #[rstest]
    fn codes_with_details_are_split_before_matching() {
        let body = error_body("WEAK_PASSWORD : Password should be at least 6 characters");
        assert_eq!(body.code(), "WEAK_PASSWORD");
        assert!(matches!(
            body.into_port_error(),
            IdentityProviderError::Rejected { .. }
        ));
    }

    #[rstest]
    fn disabled_users_are_rejected_with_the_provider_message() {
        assert_eq!(
            error_body("USER_DISABLED").into_port_error(),
            IdentityProviderError::rejected("USER_DISABLED")
        );
    }

    #[rstest]
    fn refresh_responses_use_snake_case() {
        let body = br#"{"expires_in":"3600","token_type":"Bearer","refresh_token":"r-2","id_token":"i-2","user_id":"uid-42","project_id":"1"}"#;
        let response: RefreshResponseDto = serde_json::from_slice(body).expect("decodes");
        assert_eq!(response.user_id, "uid-42");
        assert_eq!(response.refresh_token, "r-2");
    }

    #[rstest]
    fn oob_requests_omit_absent_fields() {
        let body = OobCodeRequestDto {
            request_type: "PASSWORD_RESET",
            email: Some("rick@citadel.test"),
            id_token: None,
        };
        let json = serde_json::to_value(&body).expect("serialises");
        assert_eq!(
            json,
            serde_json::json!({ "requestType": "PASSWORD_RESET", "email": "rick@citadel.test" })
        );
    }
}
