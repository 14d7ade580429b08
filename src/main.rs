//! Gadget Concierge bootstrap: load configuration, wire the adapters into
//! the router, and serve the webhook endpoint.

use std::sync::Arc;
use std::time::Duration;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use gadget_concierge::adapters::http::{app_router, WebhookState};
use gadget_concierge::adapters::line::{LineApiConfig, LineTransport};
use gadget_concierge::adapters::openai::{OpenAiCompletionService, OpenAiConfig};
use gadget_concierge::adapters::storage::FileWishlistStore;
use gadget_concierge::application::handlers::{HandlerContext, WishlistCommands};
use gadget_concierge::application::{ReplyDispatcher, Router, SessionStore};
use gadget_concierge::config::AppConfig;
use gadget_concierge::ports::{CompletionService, MessagingTransport, WishlistStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        "starting gadget-concierge"
    );

    // Adapters behind the ports.
    let completion: Arc<dyn CompletionService> = Arc::new(OpenAiCompletionService::new(
        OpenAiConfig::from(&config.ai),
    ));
    let transport: Arc<dyn MessagingTransport> =
        Arc::new(LineTransport::new(LineApiConfig::from(&config.line)));
    let wishlist_store: Arc<dyn WishlistStore> =
        Arc::new(FileWishlistStore::new(&config.wishlist.dir));

    // Application core.
    let sessions = SessionStore::new();
    let handlers = HandlerContext::new(completion, &config.ai, &config.conversation);
    let wishlist = WishlistCommands::new(wishlist_store);
    let router = Arc::new(Router::new(
        sessions,
        handlers,
        wishlist,
        &config.conversation,
    ));
    let dispatcher = ReplyDispatcher::new(transport.clone());

    let state = WebhookState::new(transport, router, dispatcher);
    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "listening for webhooks");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
