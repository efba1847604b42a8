//! Identity types shared between the login flow and the session layer.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Length of the anti-forgery state token issued on the login page.
pub const STATE_TOKEN_LEN: usize = 32;

const STATE_TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random anti-forgery token binding a login attempt to the
/// session that initiated it.
pub fn generate_state_token() -> String {
    let mut rng = rand::thread_rng();
    (0..STATE_TOKEN_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..STATE_TOKEN_CHARSET.len());
            char::from(STATE_TOKEN_CHARSET[idx])
        })
        .collect()
}

/// Authenticated identity bound to a browser session.
///
/// Lifecycle: created on successful login, cleared on logout. The session
/// cookie is the only place this state lives, so a process restart or cookie
/// expiry returns the browser to anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Access token as issued by the provider; needed again for revocation.
    pub access_token: String,
    /// The provider's subject identifier for this user.
    pub provider_id: String,
    /// Display name reported by the provider.
    pub username: String,
    /// Avatar URL reported by the provider.
    pub picture: String,
    /// Email address reported by the provider.
    pub email: String,
    /// Internal id of the provisioned user row.
    pub user_id: UserId,
}

/// Result of exchanging an authorization code at the provider's token
/// endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangedToken {
    pub access_token: String,
    /// Subject claim carried in the id token alongside the access token.
    pub subject: String,
}

/// Token metadata reported by the provider's token-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    /// Subject the access token was issued for.
    pub user_id: String,
    /// Client id the access token was issued to.
    pub issued_to: String,
}

/// Profile fields fetched from the provider's user-info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub name: String,
    pub picture: Option<String>,
    pub email: String,
}
