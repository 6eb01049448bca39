// Quote feed module.
// Fetches the remote quote list behind the QuoteSource trait.

pub mod client;

pub use client::{CONNECT_TIMEOUT, FeedClient, QuoteSource, READ_TIMEOUT, parse_feed};
