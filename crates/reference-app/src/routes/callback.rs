//! Redirect-back endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use oauth_flow::{CallbackParams, CallbackView, handle_callback};

use crate::AppState;
use crate::html;

/// Handler for `GET /callback`
///
/// Renders the `callback` view when a code arrived (even if its exchange
/// failed) and `callback-error` with a 400 otherwise.
pub async fn handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let view = handle_callback(&state.tokens, params).await;

    let status = match &view {
        CallbackView::Success { .. } => StatusCode::OK,
        CallbackView::Error { .. } => StatusCode::BAD_REQUEST,
    };

    (status, Html(html::callback_view(&view))).into_response()
}
