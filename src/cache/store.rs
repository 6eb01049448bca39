// Cache store primitives.
// JSON file reads and atomic writes, plus the cached quote record and its freshness rules.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::quotes::Quote;

/// Default lifetime of fetched quotes: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// The last successful fetch and when it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    pub quotes: Vec<Quote>,
    pub fetched_at_epoch_millis: i64,
}

impl CacheRecord {
    pub fn new(quotes: Vec<Quote>, fetched_at_epoch_millis: i64) -> Self {
        Self {
            quotes,
            fetched_at_epoch_millis,
        }
    }

    /// Fetch time as a UTC timestamp, if representable.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.fetched_at_epoch_millis)
    }

    /// Whether the record is still fresh at `now_millis`.
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        is_within_ttl(self.fetched_at_epoch_millis, now_millis, ttl)
    }
}

/// `now - fetched_at < ttl`, in epoch milliseconds.
///
/// A timestamp in the future (clock moved backwards) counts as fresh, matching a plain
/// subtraction.
pub fn is_within_ttl(fetched_at_millis: i64, now_millis: i64, ttl: Duration) -> bool {
    let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now_millis.saturating_sub(fetched_at_millis) < ttl_millis
}

/// Read a JSON file. A missing file is `None`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let value: T = serde_json::from_str(&contents)?;
    Ok(Some(value))
}

/// Write a value as JSON. Readers see either the old file or the complete new one.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, json.as_bytes())
}

/// Write bytes via a synced temp file renamed over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Whether `path` is a file holding at least one byte.
pub fn non_empty_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}
