//! OAuth 2.0 / OIDC authorization code client for an Ory Hydra style server
//!
//! Provides:
//! - Authorization code redemption at the token endpoint
//! - Redirect-back orchestration (upstream errors, missing code, exchange)
//! - Consent decisions against the admin consent API

pub mod admin;
pub mod callback;
pub mod config;
pub mod consent;
pub mod token;

pub use admin::{
    AcceptConsentRequest, AdminApi, AdminApiError, ConsentRequest, HydraAdminClient, RedirectTo,
};
pub use callback::{CallbackParams, CallbackView, handle_callback};
pub use config::{AdminConfig, ClientConfig};
pub use consent::{ConsentEngine, ConsentForm, ConsentResponse, DENY_ACCESS_SUBMIT_VALUE};
pub use token::{CallbackResult, TokenExchangeClient, TokenExchangeError, TokenResponse};
