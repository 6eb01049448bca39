// Quote feed record types.
// Field names follow the remote JSON feed.

use serde::{Deserialize, Serialize};

/// A single quote from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub quote: String,
    pub author: String,
    pub theme: String,
    /// Sarcastic variant shown on the back of the card.
    #[serde(
        rename = "flippedQuote",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub flipped_quote: Option<String>,
}

impl Quote {
    pub fn new(
        quote: impl Into<String>,
        author: impl Into<String>,
        theme: impl Into<String>,
    ) -> Self {
        Self {
            quote: quote.into(),
            author: author.into(),
            theme: theme.into(),
            flipped_quote: None,
        }
    }

    /// The natural key of this quote.
    pub fn key(&self) -> QuoteKey {
        QuoteKey {
            quote: self.quote.clone(),
            author: self.author.clone(),
        }
    }

    /// Whether this quote has the given key, without allocating one.
    pub fn has_key(&self, key: &QuoteKey) -> bool {
        self.quote == key.quote && self.author == key.author
    }
}

/// Identity of a quote: its text and author.
///
/// Positions in a quote list change on every shuffle, so likes, bookmarks and lookups go
/// through this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuoteKey {
    pub quote: String,
    pub author: String,
}
