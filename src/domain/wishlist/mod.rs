//! Wishlist value objects.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Lowest price seen for a wishlist item, in New Taiwan dollars.
///
/// Serialized as a bare integer when known, or the string `"unknown"`,
/// matching the on-disk wishlist format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LowestPrice {
    Known(u64),
    Unknown(UnknownMarker),
}

/// The literal `"unknown"` sentinel in the wishlist file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownMarker {
    #[serde(rename = "unknown")]
    Unknown,
}

impl LowestPrice {
    /// The unknown-price sentinel.
    pub fn unknown() -> Self {
        LowestPrice::Unknown(UnknownMarker::Unknown)
    }

    /// A known price in NT$.
    pub fn known(amount: u64) -> Self {
        LowestPrice::Known(amount)
    }
}

impl Default for LowestPrice {
    fn default() -> Self {
        Self::unknown()
    }
}

/// One entry in a user's wishlist.
///
/// Uniqueness within a list is by exact `name` match, case-sensitive, no
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub name: String,
    pub added_at: Timestamp,
    #[serde(default)]
    pub lowest_price: LowestPrice,
}

impl WishlistItem {
    /// Creates an item added now with an unknown lowest price.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            added_at: Timestamp::now(),
            lowest_price: LowestPrice::unknown(),
        }
    }
}
