// Application configuration.
// Read from FLIPQUOTES_* environment variables with platform directory defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{DEFAULT_TTL, paths};
use crate::error::{FlipQuotesError, Result};
use crate::feed::{CONNECT_TIMEOUT, READ_TIMEOUT};

pub const DEFAULT_FEED_URL: &str = "https://raw.githubusercontent.com/Amrish-Sharma/fq_quotes/refs/heads/quote-with-theme/quote_with_theme.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub feed_url: String,
    pub cache_dir: PathBuf,
    pub data_dir: PathBuf,
    pub cache_ttl: Duration,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Config {
    /// Parse configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let feed_url =
            lookup("FLIPQUOTES_FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string());

        let cache_dir = lookup("FLIPQUOTES_CACHE_DIR")
            .map(PathBuf::from)
            .or_else(paths::cache_dir)
            .ok_or_else(|| {
                FlipQuotesError::Other("Could not determine cache directory".to_string())
            })?;

        let data_dir = lookup("FLIPQUOTES_DATA_DIR")
            .map(PathBuf::from)
            .or_else(paths::data_dir)
            .unwrap_or_else(|| cache_dir.clone());

        let cache_ttl = match lookup("FLIPQUOTES_CACHE_TTL_HOURS") {
            Some(raw) => {
                let invalid = || {
                    FlipQuotesError::Other(format!("Invalid FLIPQUOTES_CACHE_TTL_HOURS: {}", raw))
                };
                let hours: u64 = raw.trim().parse().map_err(|_| invalid())?;
                let secs = hours.checked_mul(60 * 60).ok_or_else(invalid)?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TTL,
        };

        Ok(Self {
            feed_url,
            cache_dir,
            data_dir,
            cache_ttl,
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
        })
    }
}
