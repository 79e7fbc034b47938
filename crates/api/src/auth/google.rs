//! Google sign-in via the OAuth 2.0 authorization code flow.
//!
//! Handlers talk to a [`GoogleIdentityProvider`] trait object so integration
//! tests can substitute a fake for the network calls.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GoogleConfig;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// The parts of a Google account the shop uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoogleProfile {
    /// Stable Google subject id.
    #[serde(rename = "sub")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "picture", default)]
    pub avatar: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GoogleAuthError {
    #[error("Google request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid Google endpoint URL: {0}")]
    Url(String),
}

/// Source of Google identities.
#[async_trait]
pub trait GoogleIdentityProvider: Send + Sync {
    /// URL of the consent screen the browser is redirected to.
    fn authorize_url(&self) -> Result<String, GoogleAuthError>;

    /// Exchange an authorization code for the signed-in user's profile.
    async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, GoogleAuthError>;
}

/// [`GoogleIdentityProvider`] backed by Google's OAuth endpoints.
pub struct GoogleOAuthClient {
    config: GoogleConfig,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl GoogleIdentityProvider for GoogleOAuthClient {
    fn authorize_url(&self) -> Result<String, GoogleAuthError> {
        let url = reqwest::Url::parse_with_params(
            AUTHORIZE_ENDPOINT,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("prompt", "select_account consent"),
            ],
        )
        .map_err(|e| GoogleAuthError::Url(e.to_string()))?;
        Ok(url.into())
    }

    async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, GoogleAuthError> {
        let token: TokenResponse = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let profile = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&token.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(profile)
    }
}
