//! HTTP routes for the webhook surface.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{callback, health, WebhookState};

/// Creates the application router with all endpoints.
pub fn app_router(state: WebhookState) -> Router {
    Router::new()
        .route("/callback", post(callback))
        .route("/health", get(health))
        .with_state(state)
}
