//! Authorization code exchange at the token endpoint
//!
//! Handles:
//! - Credential preconditions (client ID and secret must be configured)
//! - Form-encoded `authorization_code` grant with HTTP Basic client auth
//! - Token response parsing

use base64::Engine;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClientConfig;

/// Successful token endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Parse a token endpoint JSON body. Unknown fields are ignored.
    pub fn from_json(body: &str) -> Result<Self, TokenExchangeError> {
        serde_json::from_str(body).map_err(TokenExchangeError::Parse)
    }
}

/// Outcome of processing a redirect-back: tokens or a displayable error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackResult {
    Tokens(TokenResponse),
    Failed(String),
}

impl CallbackResult {
    pub fn token_response(&self) -> Option<&TokenResponse> {
        match self {
            CallbackResult::Tokens(tokens) => Some(tokens),
            CallbackResult::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CallbackResult::Tokens(_) => None,
            CallbackResult::Failed(message) => Some(message),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenExchangeError {
    #[error("request to token endpoint failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("token endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse token response: {0}")]
    Parse(serde_json::Error),
}

/// Back-channel client for redeeming authorization codes.
///
/// Holds only read-only configuration and a pooled `reqwest::Client`, so one
/// instance can serve any number of concurrent callbacks.
pub struct TokenExchangeClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl TokenExchangeClient {
    pub fn new(config: ClientConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Redeem `code` for tokens.
    ///
    /// Never fails: missing credentials and any transport, status or parse
    /// problem come back as `CallbackResult::Failed`. `state` and `scope` are
    /// accepted for logging only.
    pub async fn process_callback(
        &self,
        code: &str,
        state: Option<&str>,
        scope: Option<&str>,
    ) -> CallbackResult {
        let Some(client_id) = self.config.client_id() else {
            tracing::warn!("Client ID not configured - returning code without token exchange");
            return CallbackResult::Failed(
                "Client ID not configured. Set oauth.client-id in config.json or pass --client-id"
                    .to_string(),
            );
        };

        let Some(client_secret) = self.config.client_secret() else {
            tracing::warn!("Client secret not configured - returning code without token exchange");
            return CallbackResult::Failed(
                "Client secret not configured. Set oauth.client-secret in config.json or pass --client-secret"
                    .to_string(),
            );
        };

        tracing::debug!(state = ?state, scope = ?scope, "Processing authorization code");

        match self
            .exchange_code_for_tokens(code, client_id, client_secret)
            .await
        {
            Ok(tokens) => CallbackResult::Tokens(tokens),
            Err(e) => {
                tracing::error!("Failed to exchange code for tokens: {}", e);
                CallbackResult::Failed(format!("Token exchange failed: {}", e))
            }
        }
    }

    async fn exchange_code_for_tokens(
        &self,
        code: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<TokenResponse, TokenExchangeError> {
        let body = encode_form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", client_id),
        ]);

        tracing::info!("Exchanging code for tokens at {}", self.config.token_endpoint);

        let response = self
            .http
            .post(self.config.token_endpoint.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(AUTHORIZATION, basic_credentials(client_id, client_secret))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            tracing::error!("Token exchange failed with status {}: {}", status.as_u16(), body);
            return Err(TokenExchangeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Token exchange successful");
        TokenResponse::from_json(&body)
    }
}

/// `application/x-www-form-urlencoded` body with every key and value
/// percent-encoded on its own.
pub fn encode_form(params: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// `Authorization` header value for `client_secret_basic`
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    let credentials = format!("{}:{}", client_id, client_secret);
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes())
    )
}
