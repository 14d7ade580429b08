//! Storage adapters for the wishlist collection.

mod file_wishlist_store;
mod in_memory_wishlist_store;

pub use file_wishlist_store::FileWishlistStore;
pub use in_memory_wishlist_store::InMemoryWishlistStore;
