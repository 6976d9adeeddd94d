//! Admin consent API of the authorization server
//!
//! `AdminApi` is the contract the consent engine depends on.
//! `HydraAdminClient` implements it over HTTP against the Ory Hydra admin
//! endpoints:
//! - `GET /admin/oauth2/auth/requests/consent`
//! - `PUT /admin/oauth2/auth/requests/consent/accept`
//! - `PUT /admin/oauth2/auth/requests/consent/reject`

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::AdminConfig;

#[derive(Debug, Error)]
pub enum AdminApiError {
    #[error("admin API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("admin API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode admin API response: {0}")]
    Decode(serde_json::Error),

    #[error("invalid admin URL: {0}")]
    InvalidUrl(String),
}

/// A pending consent request as reported by the authorization server
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConsentRequest {
    /// The subject already granted these scopes and the server only needs confirmation
    #[serde(default, deserialize_with = "null_as_default")]
    pub skip: bool,

    /// Scopes the client asked for, in request order
    #[serde(default, deserialize_with = "null_as_default")]
    pub requested_scope: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub requested_access_token_audience: Vec<String>,
}

/// Grant sent when accepting a consent request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptConsentRequest {
    pub consent_challenge: String,
    pub remember: bool,
    pub grant_access_token_audience: Vec<String>,
    pub scopes: Vec<String>,
}

/// Where the user agent goes next
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedirectTo {
    pub redirect_to: Url,
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn get_consent_request(&self, challenge: &str) -> Result<ConsentRequest, AdminApiError>;

    async fn accept_consent_request(
        &self,
        request: &AcceptConsentRequest,
    ) -> Result<RedirectTo, AdminApiError>;

    async fn reject_consent_request(&self, challenge: &str) -> Result<RedirectTo, AdminApiError>;
}

#[async_trait]
impl<A: AdminApi + ?Sized> AdminApi for Arc<A> {
    async fn get_consent_request(&self, challenge: &str) -> Result<ConsentRequest, AdminApiError> {
        (**self).get_consent_request(challenge).await
    }

    async fn accept_consent_request(
        &self,
        request: &AcceptConsentRequest,
    ) -> Result<RedirectTo, AdminApiError> {
        (**self).accept_consent_request(request).await
    }

    async fn reject_consent_request(&self, challenge: &str) -> Result<RedirectTo, AdminApiError> {
        (**self).reject_consent_request(challenge).await
    }
}

#[derive(Debug, Serialize)]
struct AcceptConsentBody<'a> {
    grant_scope: &'a [String],
    grant_access_token_audience: &'a [String],
    remember: bool,
}

#[derive(Debug, Serialize)]
struct RejectConsentBody<'a> {
    error: &'a str,
    error_description: &'a str,
}

/// HTTP client for the Hydra admin consent endpoints
pub struct HydraAdminClient {
    config: AdminConfig,
    http: reqwest::Client,
}

impl HydraAdminClient {
    pub fn new(config: AdminConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// `{admin_url}/admin/oauth2/auth/requests/consent[/{action}]`
    fn consent_url(&self, action: Option<&str>) -> Result<Url, AdminApiError> {
        let mut url = self.config.admin_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| AdminApiError::InvalidUrl(self.config.admin_url.to_string()))?;
            segments
                .pop_if_empty()
                .extend(["admin", "oauth2", "auth", "requests", "consent"]);
            if let Some(action) = action {
                segments.push(action);
            }
        }
        Ok(url)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AdminApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AdminApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(AdminApiError::Decode)
    }
}

#[async_trait]
impl AdminApi for HydraAdminClient {
    async fn get_consent_request(&self, challenge: &str) -> Result<ConsentRequest, AdminApiError> {
        tracing::debug!(challenge, "Fetching consent request");

        let response = self
            .http
            .get(self.consent_url(None)?)
            .query(&[("consent_challenge", challenge)])
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn accept_consent_request(
        &self,
        request: &AcceptConsentRequest,
    ) -> Result<RedirectTo, AdminApiError> {
        tracing::info!(
            challenge = %request.consent_challenge,
            remember = request.remember,
            "Accepting consent request"
        );

        let body = AcceptConsentBody {
            grant_scope: &request.scopes,
            grant_access_token_audience: &request.grant_access_token_audience,
            remember: request.remember,
        };

        let response = self
            .http
            .put(self.consent_url(Some("accept"))?)
            .query(&[("consent_challenge", request.consent_challenge.as_str())])
            .json(&body)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn reject_consent_request(&self, challenge: &str) -> Result<RedirectTo, AdminApiError> {
        tracing::info!(challenge, "Rejecting consent request");

        let body = RejectConsentBody {
            error: "access_denied",
            error_description: "The resource owner denied the request",
        };

        let response = self
            .http
            .put(self.consent_url(Some("reject"))?)
            .query(&[("consent_challenge", challenge)])
            .json(&body)
            .send()
            .await?;

        Self::read_json(response).await
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
