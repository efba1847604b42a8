//! Outbound adapter for the identity provider's OAuth2 endpoints.
//!
//! All network I/O lives in [`GoogleIdentityProvider`]; response decoding is
//! kept in pure functions so the mapping is unit-testable without a network.

mod credentials;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{ExchangedToken, Profile, TokenInfo};

pub use credentials::{ClientSecrets, ClientSecretsError, WebClientSecrets};

/// Provider endpoint URLs; overridable so tests and other deployments can
/// point elsewhere.
#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub token_url: String,
    pub token_info_url: String,
    pub user_info_url: String,
    pub revoke_url: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            token_url: "https://oauth2.googleapis.com/token".to_owned(),
            token_info_url: "https://www.googleapis.com/oauth2/v1/tokeninfo".to_owned(),
            user_info_url: "https://www.googleapis.com/oauth2/v1/userinfo".to_owned(),
            revoke_url: "https://accounts.google.com/o/oauth2/revoke".to_owned(),
        }
    }
}

/// [`IdentityProvider`] implementation speaking to Google's OAuth2 surface.
#[derive(Clone)]
pub struct GoogleIdentityProvider {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    endpoints: GoogleEndpoints,
}

impl GoogleIdentityProvider {
    /// Create a provider adapter for the given application credentials.
    pub fn new(secrets: &WebClientSecrets) -> Self {
        Self::with_endpoints(secrets, GoogleEndpoints::default())
    }

    /// Create a provider adapter against custom endpoint URLs.
    pub fn with_endpoints(secrets: &WebClientSecrets, endpoints: GoogleEndpoints) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: secrets.client_id.clone(),
            client_secret: secrets.client_secret.clone(),
            endpoints,
        }
    }
}

fn network(err: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::network(err.to_string())
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn exchange_code(&self, code: &str) -> Result<ExchangedToken, IdentityProviderError> {
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", "postmessage"),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(network)?;
        let status = response.status().as_u16();
        let body: Value = response.json().await.map_err(network)?;
        debug!(status, "token endpoint replied");
        parse_token_response(status, &body)
    }

    async fn verify_token(&self, access_token: &str) -> Result<TokenInfo, IdentityProviderError> {
        let body: Value = self
            .http
            .get(&self.endpoints.token_info_url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(network)?
            .json()
            .await
            .map_err(network)?;
        parse_token_info(&body)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, IdentityProviderError> {
        let body: Value = self
            .http
            .get(&self.endpoints.user_info_url)
            .query(&[("access_token", access_token), ("alt", "json")])
            .send()
            .await
            .map_err(network)?
            .json()
            .await
            .map_err(network)?;
        parse_profile(&body)
    }

    async fn revoke(&self, access_token: &str) -> Result<(), IdentityProviderError> {
        let response = self
            .http
            .get(&self.endpoints.revoke_url)
            .query(&[("token", access_token)])
            .send()
            .await
            .map_err(network)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(IdentityProviderError::revocation(status.as_u16()))
        }
    }
}

/// Decode the token endpoint's response into an access token plus subject.
fn parse_token_response(
    status: u16,
    body: &Value,
) -> Result<ExchangedToken, IdentityProviderError> {
    if let Some(error) = body.get("error") {
        let description = body
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(IdentityProviderError::exchange(format!(
            "{error}: {description}"
        )));
    }
    if !(200..300).contains(&status) {
        return Err(IdentityProviderError::exchange(format!(
            "token endpoint returned status {status}"
        )));
    }
    let access_token = body
        .get("access_token")
        .and_then(Value::as_str)
        .ok_or_else(|| IdentityProviderError::exchange("response carried no access token"))?;
    let id_token = body
        .get("id_token")
        .and_then(Value::as_str)
        .ok_or_else(|| IdentityProviderError::exchange("response carried no id token"))?;
    Ok(ExchangedToken {
        access_token: access_token.to_owned(),
        subject: decode_id_token_subject(id_token)?,
    })
}

/// Read the `sub` claim out of an id token.
///
/// The claims are read without signature verification: the token arrives
/// directly from the provider's token endpoint over TLS, not from the
/// browser.
fn decode_id_token_subject(id_token: &str) -> Result<String, IdentityProviderError> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| IdentityProviderError::exchange("malformed id token"))?;
    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| IdentityProviderError::exchange("malformed id token payload"))?;
    let claims: Value = serde_json::from_slice(&decoded)
        .map_err(|_| IdentityProviderError::exchange("unreadable id token claims"))?;
    claims
        .get("sub")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| IdentityProviderError::exchange("id token carried no subject"))
}

/// Decode the token-info endpoint's response.
fn parse_token_info(body: &Value) -> Result<TokenInfo, IdentityProviderError> {
    if let Some(error) = body.get("error") {
        return Err(IdentityProviderError::validation(error.to_string()));
    }
    serde_json::from_value(body.clone())
        .map_err(|_| IdentityProviderError::network("malformed token info response"))
}

/// Decode the user-info endpoint's response.
fn parse_profile(body: &Value) -> Result<Profile, IdentityProviderError> {
    serde_json::from_value(body.clone())
        .map_err(|_| IdentityProviderError::network("malformed user info response"))
}
