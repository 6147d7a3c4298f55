use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::aideon::catalog::error::{CatalogError, Result};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Service-account key document as downloaded from the cloud console.
///
/// Only the fields needed to request an access token are kept; the rest of
/// the document is ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountCredentials {
    /// Parses a credential document. Unusable documents are reported as
    /// [`CatalogError::AuthFailure`].
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let credentials: Self = serde_json::from_slice(bytes).map_err(|err| {
            CatalogError::AuthFailure(format!("invalid credentials document: {err}"))
        })?;
        if credentials.client_email.trim().is_empty() {
            return Err(CatalogError::AuthFailure(
                "credentials document has an empty client_email".into(),
            ));
        }
        if credentials.private_key.trim().is_empty() {
            return Err(CatalogError::AuthFailure(
                "credentials document has an empty private_key".into(),
            ));
        }
        Ok(credentials)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_json(&bytes)
    }

    pub(crate) fn private_key_pem(&self) -> &[u8] {
        self.private_key.as_bytes()
    }
}

impl fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}
