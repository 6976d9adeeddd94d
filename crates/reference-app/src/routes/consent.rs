//! Consent endpoint
//!
//! Handles:
//! - The initial redirect from Hydra carrying a `consent_challenge`
//! - Submission of the consent form

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use oauth_flow::{AdminApiError, ConsentForm, ConsentResponse};
use serde::Deserialize;

use crate::AppState;
use crate::html;

#[derive(Debug, Deserialize)]
pub struct ConsentQuery {
    #[serde(default)]
    pub consent_challenge: Option<String>,
}

/// Handler for `GET /consent`
pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConsentQuery>,
) -> Response {
    let Some(challenge) = query.consent_challenge.filter(|c| !c.is_empty()) else {
        tracing::debug!("Consent requested without a challenge");
        return (
            StatusCode::BAD_REQUEST,
            Html(html::error_page(
                "Invalid Request",
                "Expected a consent_challenge to be set but received none.",
            )),
        )
            .into_response();
    };

    match state.consent.process_initial_consent_request(&challenge).await {
        Ok(response) => respond(response),
        Err(e) => admin_failure(&challenge, e),
    }
}

/// Handler for `POST /consent`
///
/// The form uses repeated `scopes` fields, hence the `axum_extra` extractor.
pub async fn post_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ConsentForm>,
) -> Response {
    let challenge = form.consent_challenge.clone();

    match state.consent.process_consent_form(form).await {
        Ok(response) => respond(response),
        Err(e) => admin_failure(&challenge, e),
    }
}

fn respond(response: ConsentResponse) -> Response {
    match response {
        ConsentResponse::DisplayUi {
            requested_scope,
            consent_challenge,
        } => Html(html::consent_page(&consent_challenge, &requested_scope)).into_response(),
        ConsentResponse::Skip { redirect_to } => {
            tracing::debug!("Consent skipped, redirecting back to Hydra");
            Redirect::to(redirect_to.as_str()).into_response()
        }
        ConsentResponse::Accepted { redirect_to } => {
            tracing::info!("Consent granted");
            Redirect::to(redirect_to.as_str()).into_response()
        }
        ConsentResponse::Rejected { redirect_to } => {
            tracing::info!("Consent denied");
            Redirect::to(redirect_to.as_str()).into_response()
        }
    }
}

/// Admin API failures end the request with a 502; nothing is retried.
fn admin_failure(challenge: &str, error: AdminApiError) -> Response {
    tracing::error!(challenge, "Consent request failed: {}", error);
    (
        StatusCode::BAD_GATEWAY,
        Html(html::error_page(
            "Consent Unavailable",
            "The authorization server could not process this consent request.",
        )),
    )
        .into_response()
}
