// FlipQuotes core library.
// Quote feed caching, quote list views, user marks, and the box blur used for card transitions.

pub mod blur;
pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod prefs;
pub mod quotes;

pub use blur::{Blurred, box_blur, frosted};
pub use cache::{QuoteCache, Served};
pub use config::Config;
pub use error::{FailureKind, FlipQuotesError, Result};
pub use quotes::{Quote, QuoteKey};
