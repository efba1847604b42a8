//! Driving port for the OAuth2 identity exchange.
//!
//! Inbound handlers call this to run the authorization-code exchange without
//! knowing the provider's HTTP surface, so the login flow can be tested with
//! a scripted double instead of a network.

use async_trait::async_trait;

use crate::domain::{ExchangedToken, Profile, TokenInfo};

/// Failures raised by identity-provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityProviderError {
    /// The authorization code could not be exchanged (invalid or expired).
    #[error("authorization code exchange failed: {message}")]
    Exchange { message: String },
    /// The provider reported an error while validating the access token.
    #[error("token validation failed: {message}")]
    Validation { message: String },
    /// The provider refused to revoke the token.
    #[error("token revocation failed with status {status}")]
    Revocation { status: u16 },
    /// The provider could not be reached or returned an unreadable response.
    #[error("identity provider request failed: {message}")]
    Network { message: String },
}

impl IdentityProviderError {
    /// Create an exchange error with the given message.
    pub fn exchange(message: impl Into<String>) -> Self {
        Self::Exchange {
            message: message.into(),
        }
    }

    /// Create a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a revocation error for the given response status.
    pub fn revocation(status: u16) -> Self {
        Self::Revocation { status }
    }

    /// Create a network error with the given message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code for an access token and subject.
    async fn exchange_code(&self, code: &str) -> Result<ExchangedToken, IdentityProviderError>;

    /// Ask the provider which subject and client the access token belongs to.
    async fn verify_token(&self, access_token: &str) -> Result<TokenInfo, IdentityProviderError>;

    /// Fetch the profile of the user the access token belongs to.
    async fn fetch_profile(&self, access_token: &str) -> Result<Profile, IdentityProviderError>;

    /// Revoke an access token.
    async fn revoke(&self, access_token: &str) -> Result<(), IdentityProviderError>;
}
