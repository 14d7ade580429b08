//! Application layer: session store, command router, intent handlers, and
//! the failure-tolerant reply dispatcher.

pub mod dispatcher;
pub mod handlers;
pub mod router;
pub mod session;

pub use dispatcher::ReplyDispatcher;
pub use router::Router;
pub use session::SessionStore;
