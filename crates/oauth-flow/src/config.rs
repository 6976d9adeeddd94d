//! Client and admin endpoint configuration

use serde::{Deserialize, Serialize};
use url::Url;

/// Confidential client settings used for the token exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// OAuth client identifier (may be unset until the client is registered)
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Redirect URI registered for this client
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: Url,

    /// Authorization server token endpoint
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: Url,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: default_redirect_uri(),
            token_endpoint: default_token_endpoint(),
        }
    }
}

impl ClientConfig {
    /// Client ID, treating a blank value as unset
    pub fn client_id(&self) -> Option<&str> {
        non_blank(self.client_id.as_deref())
    }

    /// Client secret, treating a blank value as unset
    pub fn client_secret(&self) -> Option<&str> {
        non_blank(self.client_secret.as_deref())
    }
}

/// Admin API location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Base URL of the admin interface (e.g. `http://localhost:4445`)
    #[serde(default = "default_admin_url")]
    pub admin_url: Url,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            admin_url: default_admin_url(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_redirect_uri() -> Url {
    Url::parse("http://127.0.0.1:8080/callback").expect("default redirect URI is valid")
}

fn default_token_endpoint() -> Url {
    Url::parse("http://localhost:4444/oauth2/token").expect("default token endpoint is valid")
}

fn default_admin_url() -> Url {
    Url::parse("http://localhost:4445").expect("default admin URL is valid")
}
