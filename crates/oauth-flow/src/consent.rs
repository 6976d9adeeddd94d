//! Consent decisions for pending consent requests
//!
//! Admin API failures are returned to the caller untouched: there is no
//! partial-consent state to fall back to.

use serde::{Deserialize, Deserializer};
use url::Url;

use crate::admin::{AcceptConsentRequest, AdminApi, AdminApiError};

/// Submit button value of the deny action on the consent page
pub const DENY_ACCESS_SUBMIT_VALUE: &str = "Deny access";

/// Consent page submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsentForm {
    pub consent_challenge: String,

    /// Raw value of the submit button that was pressed
    #[serde(default)]
    pub submit: String,

    #[serde(default, deserialize_with = "checkbox")]
    pub remember: bool,

    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Outcome of one consent workflow invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentResponse {
    /// Ask the user
    DisplayUi {
        requested_scope: Vec<String>,
        consent_challenge: String,
    },
    /// Previously granted consent was re-confirmed without asking
    Skip { redirect_to: Url },
    Accepted { redirect_to: Url },
    Rejected { redirect_to: Url },
}

/// Stateless consent workflow over an [`AdminApi`]
pub struct ConsentEngine<A> {
    admin: A,
}

impl<A: AdminApi> ConsentEngine<A> {
    pub fn new(admin: A) -> Self {
        Self { admin }
    }

    /// Handle the first visit for `consent_challenge`.
    ///
    /// A request flagged `skip` is accepted immediately with the scopes and
    /// audience it asked for; anything else is handed to the user.
    pub async fn process_initial_consent_request(
        &self,
        consent_challenge: &str,
    ) -> Result<ConsentResponse, AdminApiError> {
        let consent_request = self.admin.get_consent_request(consent_challenge).await?;

        if consent_request.skip {
            tracing::info!(challenge = consent_challenge, "Consent previously granted, skipping UI");

            let accept = AcceptConsentRequest {
                consent_challenge: consent_challenge.to_string(),
                remember: true,
                grant_access_token_audience: consent_request.requested_access_token_audience,
                scopes: consent_request.requested_scope,
            };
            let redirect = self.admin.accept_consent_request(&accept).await?;
            return Ok(ConsentResponse::Skip {
                redirect_to: redirect.redirect_to,
            });
        }

        Ok(ConsentResponse::DisplayUi {
            requested_scope: consent_request.requested_scope,
            consent_challenge: consent_challenge.to_string(),
        })
    }

    /// Handle a consent page submission.
    ///
    /// Only [`DENY_ACCESS_SUBMIT_VALUE`] rejects; every other submit value is
    /// treated as acceptance. The granted audience always comes from a fresh
    /// fetch of the consent request, never from the form.
    pub async fn process_consent_form(
        &self,
        consent_form: ConsentForm,
    ) -> Result<ConsentResponse, AdminApiError> {
        let consent_challenge = consent_form.consent_challenge;

        if consent_form.submit == DENY_ACCESS_SUBMIT_VALUE {
            let redirect = self.admin.reject_consent_request(&consent_challenge).await?;
            return Ok(ConsentResponse::Rejected {
                redirect_to: redirect.redirect_to,
            });
        }

        let consent_request = self.admin.get_consent_request(&consent_challenge).await?;

        let accept = AcceptConsentRequest {
            consent_challenge,
            remember: consent_form.remember,
            grant_access_token_audience: consent_request.requested_access_token_audience,
            scopes: consent_form.scopes,
        };
        let redirect = self.admin.accept_consent_request(&accept).await?;

        Ok(ConsentResponse::Accepted {
            redirect_to: redirect.redirect_to,
        })
    }
}

/// HTML checkbox: `on`, `true` or `1` when ticked, absent otherwise
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        value.as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("on" | "true" | "1")
    ))
}
