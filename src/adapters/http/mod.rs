//! HTTP adapter: the webhook endpoint and health check.

mod handlers;
mod routes;

pub use handlers::WebhookState;
pub use routes::app_router;
