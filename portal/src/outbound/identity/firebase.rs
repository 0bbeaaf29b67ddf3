//! Reqwest-backed identity provider speaking the Identity Toolkit REST API.
//!
//! The adapter owns transport details only: request bodies, the API key
//! query parameter, error-code mapping, and auth-state publication. The
//! initial state is unknown until [`IdentityProvider::restore_session`]
//! exchanges a stored refresh token at the secure-token endpoint, or finds
//! none to exchange.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::broadcaster::AuthStateBroadcaster;
use super::dto::{
    ErrorEnvelopeDto, LookupRequestDto, LookupResponseDto, LookupUserDto, OobCodeRequestDto,
    PasswordRequestDto, RefreshRequestDto, RefreshResponseDto, TokenResponseDto,
};
use crate::domain::ports::{
    AuthStateListener, AuthSubscription, IdentityProvider, IdentityProviderError,
    ProviderAccount,
};
use crate::domain::{AuthenticatedUser, Credentials, EmailAddress, UserId};
use crate::outbound::body_preview;

const SIGN_UP_PATH: &str = "v1/accounts:signUp";
const SIGN_IN_PATH: &str = "v1/accounts:signInWithPassword";
const SEND_OOB_CODE_PATH: &str = "v1/accounts:sendOobCode";
const LOOKUP_PATH: &str = "v1/accounts:lookup";
const REFRESH_PATH: &str = "v1/token";

/// Identity provider backed by the Identity Toolkit REST API.
pub struct FirebaseIdentityProvider {
    client: Client,
    base_url: Url,
    token_base_url: Url,
    api_key: Zeroizing<String>,
    broadcaster: AuthStateBroadcaster,
}

impl FirebaseIdentityProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// Refresh-token exchanges go to `base_url` as well until
    /// [`FirebaseIdentityProvider::with_token_base_url`] says otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            token_base_url: base_url.clone(),
            base_url,
            api_key: Zeroizing::new(api_key.into()),
            broadcaster: AuthStateBroadcaster::new(),
        })
    }

    /// Send refresh-token exchanges to `token_base_url`.
    #[must_use]
    pub fn with_token_base_url(mut self, token_base_url: Url) -> Self {
        self.token_base_url = token_base_url;
        self
    }

    fn endpoint(&self, base_url: &Url, path: &str) -> Result<Url, IdentityProviderError> {
        let mut url = base_url.join(path).map_err(|error| {
            IdentityProviderError::transport(format!("invalid identity endpoint {path:?}: {error}"))
        })?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, IdentityProviderError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.endpoint(&self.base_url, path)?)
            .json(body);
        execute(path, request).await
    }

    async fn post_form<B, T>(&self, path: &str, body: &B) -> Result<T, IdentityProviderError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.endpoint(&self.token_base_url, path)?)
            .form(body);
        execute(path, request).await
    }

    async fn password_request(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<TokenResponseDto, IdentityProviderError> {
        let body = PasswordRequestDto {
            email: credentials.email().as_str(),
            password: credentials.password(),
            return_secure_token: true,
        };
        self.post(path, &body).await
    }

    async fn lookup(&self, id_token: &str) -> Result<Option<LookupUserDto>, IdentityProviderError> {
        let response: LookupResponseDto = self
            .post(LOOKUP_PATH, &LookupRequestDto { id_token })
            .await?;
        Ok(response.users.into_iter().next())
    }

    async fn email_verified(&self, id_token: &str) -> bool {
        match self.lookup(id_token).await {
            Ok(user) => user.is_some_and(|user| user.email_verified),
            Err(error) => {
                warn!(%error, "account lookup failed; treating email as unverified");
                false
            }
        }
    }

    fn signed_in(
        &self,
        token: TokenResponseDto,
        fallback_email: &EmailAddress,
        email_verified: bool,
    ) -> Result<ProviderAccount, IdentityProviderError> {
        let email = if token.email.is_empty() {
            fallback_email.as_str().to_owned()
        } else {
            token.email
        };
        let user = AuthenticatedUser {
            user_id: provider_user_id(token.local_id)?,
            email,
            email_verified,
        };
        self.broadcaster.publish(Some(user.clone()));
        Ok(ProviderAccount {
            user,
            id_token: Zeroizing::new(token.id_token),
            refresh_token: Zeroizing::new(token.refresh_token),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderAccount, IdentityProviderError> {
        let body = RefreshRequestDto {
            grant_type: "refresh_token",
            refresh_token,
        };
        let refreshed: RefreshResponseDto = self.post_form(REFRESH_PATH, &body).await?;
        let profile = self
            .lookup(&refreshed.id_token)
            .await?
            .ok_or_else(IdentityProviderError::user_not_found)?;
        Ok(ProviderAccount {
            user: AuthenticatedUser {
                user_id: provider_user_id(refreshed.user_id)?,
                email: profile.email,
                email_verified: profile.email_verified,
            },
            id_token: Zeroizing::new(refreshed.id_token),
            refresh_token: Zeroizing::new(refreshed.refresh_token),
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn create_account(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderAccount, IdentityProviderError> {
        let token = self.password_request(SIGN_UP_PATH, credentials).await?;
        self.signed_in(token, credentials.email(), false)
    }

    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderAccount, IdentityProviderError> {
        let token = self.password_request(SIGN_IN_PATH, credentials).await?;
        let verified = self.email_verified(&token.id_token).await;
        self.signed_in(token, credentials.email(), verified)
    }

    async fn send_password_reset(&self, email: &EmailAddress) -> Result<(), IdentityProviderError> {
        let body = OobCodeRequestDto {
            request_type: "PASSWORD_RESET",
            email: Some(email.as_str()),
            id_token: None,
        };
        let _: serde_json::Value = self.post(SEND_OOB_CODE_PATH, &body).await?;
        Ok(())
    }

    async fn send_verification(
        &self,
        account: &ProviderAccount,
    ) -> Result<(), IdentityProviderError> {
        let body = OobCodeRequestDto {
            request_type: "VERIFY_EMAIL",
            email: None,
            id_token: Some(account.id_token.as_str()),
        };
        let _: serde_json::Value = self.post(SEND_OOB_CODE_PATH, &body).await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), IdentityProviderError> {
        self.broadcaster.publish(None);
        Ok(())
    }

    async fn restore_session(
        &self,
        refresh_token: Option<Zeroizing<String>>,
    ) -> Result<Option<ProviderAccount>, IdentityProviderError> {
        let Some(refresh_token) = refresh_token else {
            self.broadcaster.publish(None);
            return Ok(None);
        };
        match self.refresh(&refresh_token).await {
            Ok(account) => {
                info!(user_id = %account.user.user_id, "stored session resumed");
                self.broadcaster.publish(Some(account.user.clone()));
                Ok(Some(account))
            }
            Err(error) => {
                self.broadcaster.publish(None);
                Err(error)
            }
        }
    }

    fn subscribe_auth_state(&self, listener: AuthStateListener) -> AuthSubscription {
        self.broadcaster.subscribe(listener)
    }
}

async fn execute<T>(path: &str, request: RequestBuilder) -> Result<T, IdentityProviderError>
where
    T: DeserializeOwned,
{
    debug!(endpoint = path, "identity provider request");
    let response = request.send().await.map_err(map_transport_error)?;

    let status = response.status();
    let bytes = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, bytes.as_ref()));
    }
    serde_json::from_slice(bytes.as_ref()).map_err(|error| {
        IdentityProviderError::transport(format!("invalid identity provider JSON: {error}"))
    })
}

fn provider_user_id(raw: String) -> Result<UserId, IdentityProviderError> {
    UserId::new(raw).map_err(|error| {
        IdentityProviderError::transport(format!("provider returned an unusable user id: {error}"))
    })
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelopeDto>(body) {
        return envelope.error.into_port_error();
    }
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };
    if status.is_server_error() {
        IdentityProviderError::transport(message)
    } else {
        IdentityProviderError::rejected(message)
    }
}
