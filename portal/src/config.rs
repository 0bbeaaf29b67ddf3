//! Portal configuration loaded via OrthoConfig.
//!
//! Every value can come from the command line, a configuration file, or a
//! `PORTAL_`-prefixed environment variable. Unset values fall back to the
//! public catalog and the hosted identity service; the identity API key has
//! no default.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use pagination::DEFAULT_WINDOW_RADIUS;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_BASE_URL: &str = "https://rickandmortyapi.com/api/";
const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/";
const DEFAULT_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com/";
const DEFAULT_SESSION_FILE: &str = "portal-session.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors raised while turning settings into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A URL setting did not parse.
    #[error("{field} is not a valid URL ({value}): {message}")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Rejected value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// No identity API key was configured.
    #[error("identity_api_key is required to reach the identity provider")]
    MissingIdentityApiKey,
    /// The request timeout was zero.
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
    /// The session file cannot be used.
    #[error("session file {path} is unusable: {message}")]
    SessionFile {
        /// Configured path.
        path: String,
        /// Underlying failure.
        message: String,
    },
    /// An HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    HttpClient {
        /// Underlying error.
        message: String,
    },
}

/// Runtime settings for the portal's adapters and screens.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Base URL of the catalog REST API.
    pub catalog_base_url: Option<String>,
    /// Base URL of the identity provider REST API.
    pub identity_base_url: Option<String>,
    /// Base URL of the secure-token endpoint used to resume sessions.
    pub token_base_url: Option<String>,
    /// API key for the hosted identity provider.
    pub identity_api_key: Option<String>,
    /// File holding the tokens of the signed-in session between runs.
    pub session_file: Option<String>,
    /// Per-request timeout for outbound HTTP calls, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Pages shown either side of the current page in the pager.
    pub pagination_radius: Option<u32>,
}

impl PortalSettings {
    /// Catalog base URL, falling back to the public catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the configured value does not
    /// parse.
    pub fn catalog_base_url(&self) -> Result<Url, ConfigError> {
        parse_url(
            "catalog_base_url",
            self.catalog_base_url.as_deref(),
            DEFAULT_CATALOG_BASE_URL,
        )
    }

    /// Identity provider base URL, falling back to the hosted service.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the configured value does not
    /// parse.
    pub fn identity_base_url(&self) -> Result<Url, ConfigError> {
        parse_url(
            "identity_base_url",
            self.identity_base_url.as_deref(),
            DEFAULT_IDENTITY_BASE_URL,
        )
    }

    /// Secure-token base URL, falling back to the hosted service.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] when the configured value does not
    /// parse.
    pub fn token_base_url(&self) -> Result<Url, ConfigError> {
        parse_url(
            "token_base_url",
            self.token_base_url.as_deref(),
            DEFAULT_TOKEN_BASE_URL,
        )
    }

    /// Identity API key, treating blank values as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingIdentityApiKey`] when no key is set.
    pub fn identity_api_key(&self) -> Result<&str, ConfigError> {
        self.identity_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingIdentityApiKey)
    }

    /// Session file location.
    #[must_use]
    pub fn session_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(
            self.session_file
                .as_deref()
                .map(str::trim)
                .filter(|path| !path.is_empty())
                .unwrap_or(DEFAULT_SESSION_FILE),
        )
    }

    /// Outbound request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Pager window radius.
    #[must_use]
    pub fn pagination_radius(&self) -> u32 {
        self.pagination_radius.unwrap_or(DEFAULT_WINDOW_RADIUS)
    }
}

fn parse_url(field: &'static str, value: Option<&str>, default: &str) -> Result<Url, ConfigError> {
    let raw = value.unwrap_or(default);
    Url::parse(raw).map_err(|error| ConfigError::InvalidUrl {
        field,
        value: raw.to_owned(),
        message: error.to_string(),
    })
}
