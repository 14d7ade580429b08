//! Intent - the functional mode a user has selected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of conversation intents.
///
/// `RecommendType` is the transient first phase of the recommend flow: it
/// always transitions to `Recommend` on the next input and is never
/// dispatched to a completion handler directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    SpecQuery,
    PriceQuery,
    Compare,
    RecommendType,
    Recommend,
    Ranking,
    Review,
}

impl Intent {
    /// Maps a top-level selection keyword to its intent.
    ///
    /// Matching is exact, per the command contract; partial or embedded
    /// keywords do not select an intent.
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "查詢裝置" => Some(Intent::SpecQuery),
            "我想查詢價格" => Some(Intent::PriceQuery),
            "大車拼" => Some(Intent::Compare),
            "求推薦" => Some(Intent::RecommendType),
            "金榜題名" => Some(Intent::Ranking),
            "評價大師" => Some(Intent::Review),
            _ => None,
        }
    }

    /// Stable identifier used in logs and metrics fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::SpecQuery => "spec_query",
            Intent::PriceQuery => "price_query",
            Intent::Compare => "compare",
            Intent::RecommendType => "recommend_type",
            Intent::Recommend => "recommend",
            Intent::Ranking => "ranking",
            Intent::Review => "review",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
