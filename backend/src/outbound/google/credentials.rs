//! Client credential file loading.
//!
//! The credential file follows the provider's download format: a `web` object
//! carrying the client id and secret issued to this application.

use std::path::Path;

use serde::Deserialize;

/// Failures while loading the credential file.
#[derive(Debug, thiserror::Error)]
pub enum ClientSecretsError {
    #[error("failed to read client secrets at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse client secrets at {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Credential file contents.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub web: WebClientSecrets,
}

/// The `web` section of the credential file.
#[derive(Debug, Clone, Deserialize)]
pub struct WebClientSecrets {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientSecrets {
    /// Load and parse the credential file.
    pub fn load(path: &Path) -> Result<Self, ClientSecretsError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ClientSecretsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ClientSecretsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
