//! Redirect-back handling for the authorization code flow

use serde::Deserialize;

use crate::token::{CallbackResult, TokenExchangeClient};

/// Error code used when a success redirect carries no `code`
pub const MISSING_CODE_ERROR: &str = "missing_code";
const MISSING_CODE_DESCRIPTION: &str = "No authorization code was received";

/// Query parameters of the redirect back from the authorization server
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// What to present to the user after a redirect-back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackView {
    /// A code was received and an exchange was attempted
    Success {
        code: String,
        state: Option<String>,
        scope: Option<String>,
        result: CallbackResult,
    },
    /// The flow failed before any exchange
    Error {
        error: String,
        error_description: Option<String>,
    },
}

impl CallbackView {
    pub fn view_name(&self) -> &'static str {
        match self {
            CallbackView::Success { .. } => "callback",
            CallbackView::Error { .. } => "callback-error",
        }
    }
}

/// Decide the outcome of a redirect-back. First match wins:
/// an upstream `error`, then a missing `code`, then the token exchange.
pub async fn handle_callback(client: &TokenExchangeClient, params: CallbackParams) -> CallbackView {
    tracing::info!(
        "Callback received - code: {}, state: {:?}, scope: {:?}",
        if params.code.is_some() { "present" } else { "absent" },
        params.state,
        params.scope
    );

    if let Some(error) = params.error {
        tracing::warn!("OAuth error received: {} - {:?}", error, params.error_description);
        return CallbackView::Error {
            error,
            error_description: params.error_description,
        };
    }

    let Some(code) = params.code else {
        tracing::warn!("No authorization code received");
        return CallbackView::Error {
            error: MISSING_CODE_ERROR.to_string(),
            error_description: Some(MISSING_CODE_DESCRIPTION.to_string()),
        };
    };

    let result = client
        .process_callback(&code, params.state.as_deref(), params.scope.as_deref())
        .await;

    CallbackView::Success {
        code,
        state: params.state,
        scope: params.scope,
        result,
    }
}
