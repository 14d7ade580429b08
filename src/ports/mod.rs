//! Ports: interfaces the application core needs from external collaborators.

mod completion;
mod messaging;
mod wishlist_store;

pub use completion::{CompletionError, CompletionRequest, CompletionService};
pub use messaging::{
    MessageAction, MessagingTransport, OutgoingMessage, QuickReply, QuickReplyItem,
    TransportError,
};
pub use wishlist_store::{WishlistStore, WishlistStoreError};
