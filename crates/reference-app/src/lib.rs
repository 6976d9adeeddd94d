//! Reference OAuth 2.0 client and consent app for Ory Hydra
//!
//! Provides:
//! - `GET /callback` - redirect-back endpoint, redeems the authorization code
//! - `GET /consent` - consent prompt (or silent accept for remembered consent)
//! - `POST /consent` - consent form submission

pub mod config;
pub mod html;
pub mod routes;

use std::sync::Arc;

use axum::{Router, routing::get};
use oauth_flow::{AdminApi, ConsentEngine, HydraAdminClient, TokenExchangeClient};
use tower_http::trace::TraceLayer;

use crate::config::Config;

/// Shared application state
pub struct AppState {
    pub tokens: TokenExchangeClient,
    pub consent: ConsentEngine<Arc<dyn AdminApi>>,
}

impl AppState {
    /// Build the state from loaded configuration. Both clients share one
    /// connection pool.
    pub fn from_config(config: Config, http: reqwest::Client) -> Self {
        let admin: Arc<dyn AdminApi> = Arc::new(HydraAdminClient::new(config.hydra, http.clone()));
        Self {
            tokens: TokenExchangeClient::new(config.oauth, http),
            consent: ConsentEngine::new(admin),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/callback", get(routes::callback::handler))
        .route(
            "/consent",
            get(routes::consent::get_handler).post(routes::consent::post_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
