// Storage port for the quote cache.
// The policy reads and writes through this trait; production uses files, tests use memory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::{FlipQuotesError, Result};
use crate::quotes::Quote;

use super::paths::{LAST_UPDATE_KEY, prefs_path, quotes_path};
use super::store;

/// Durable home of the cached quotes and their fetch timestamp.
pub trait CacheStorage: Send + Sync {
    /// Cached quotes, or `None` if nothing was ever written.
    fn read_quotes(&self) -> Result<Option<Vec<Quote>>>;

    /// Replace the cached quotes. Must be all-or-nothing.
    fn write_quotes(&self, quotes: &[Quote]) -> Result<()>;

    /// Epoch milliseconds of the last successful fetch.
    fn read_timestamp(&self) -> Result<Option<i64>>;

    fn write_timestamp(&self, epoch_millis: i64) -> Result<()>;

    /// Whether a quotes record has been written and is still present.
    fn data_exists(&self) -> bool;
}

/// Filesystem storage: a quotes file plus a small key-value file for the timestamp.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_prefs(&self) -> Result<BTreeMap<String, Value>> {
        Ok(store::read_json(&prefs_path(&self.dir))?.unwrap_or_default())
    }
}

impl CacheStorage for FileStorage {
    fn read_quotes(&self) -> Result<Option<Vec<Quote>>> {
        store::read_json(&quotes_path(&self.dir))
    }

    fn write_quotes(&self, quotes: &[Quote]) -> Result<()> {
        store::write_json(&quotes_path(&self.dir), quotes)
    }

    fn read_timestamp(&self) -> Result<Option<i64>> {
        match self.read_prefs()?.get(LAST_UPDATE_KEY) {
            None => Ok(None),
            Some(value) => value.as_i64().map(Some).ok_or_else(|| {
                FlipQuotesError::Other(format!("{} is not an integer: {}", LAST_UPDATE_KEY, value))
            }),
        }
    }

    fn write_timestamp(&self, epoch_millis: i64) -> Result<()> {
        // A corrupt prefs file is replaced rather than blocking every future update.
        let mut prefs = self.read_prefs().unwrap_or_default();
        prefs.insert(LAST_UPDATE_KEY.to_string(), Value::from(epoch_millis));
        store::write_json(&prefs_path(&self.dir), &prefs)
    }

    fn data_exists(&self) -> bool {
        store::non_empty_file(&quotes_path(&self.dir))
    }
}

/// In-process storage with no durability.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    quotes: Mutex<Option<Vec<Quote>>>,
    timestamp: Mutex<Option<i64>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with a record fetched at `epoch_millis`.
    pub fn with_record(quotes: Vec<Quote>, epoch_millis: i64) -> Self {
        Self {
            quotes: Mutex::new(Some(quotes)),
            timestamp: Mutex::new(Some(epoch_millis)),
        }
    }
}

fn poisoned() -> FlipQuotesError {
    FlipQuotesError::Other("memory storage lock poisoned".to_string())
}

impl CacheStorage for MemoryStorage {
    fn read_quotes(&self) -> Result<Option<Vec<Quote>>> {
        Ok(self.quotes.lock().map_err(|_| poisoned())?.clone())
    }

    fn write_quotes(&self, quotes: &[Quote]) -> Result<()> {
        *self.quotes.lock().map_err(|_| poisoned())? = Some(quotes.to_vec());
        Ok(())
    }

    fn read_timestamp(&self) -> Result<Option<i64>> {
        Ok(*self.timestamp.lock().map_err(|_| poisoned())?)
    }

    fn write_timestamp(&self, epoch_millis: i64) -> Result<()> {
        *self.timestamp.lock().map_err(|_| poisoned())? = Some(epoch_millis);
        Ok(())
    }

    fn data_exists(&self) -> bool {
        self.quotes
            .lock()
            .map(|quotes| quotes.is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(!storage.data_exists());
        assert_eq!(storage.read_quotes().unwrap(), None);
        assert_eq!(storage.read_timestamp().unwrap(), None);

        let quotes = vec![Quote::new("A", "X", "life")];
        storage.write_quotes(&quotes).unwrap();
        storage.write_timestamp(1_234).unwrap();

        assert!(storage.data_exists());
        assert_eq!(storage.read_quotes().unwrap(), Some(quotes));
        assert_eq!(storage.read_timestamp().unwrap(), Some(1_234));
    }

    #[test]
    fn test_timestamp_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let prefs = prefs_path(temp_dir.path());
        fs::write(&prefs, r#"{"other": "kept"}"#).unwrap();

        storage.write_timestamp(99).unwrap();

        let map: BTreeMap<String, Value> = store::read_json(&prefs).unwrap().unwrap();
        assert_eq!(map["other"], Value::from("kept"));
        assert_eq!(map[LAST_UPDATE_KEY], Value::from(99));
    }

    #[test]
    fn test_corrupt_prefs_are_replaced_on_write() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        fs::write(prefs_path(temp_dir.path()), "garbage").unwrap();

        assert!(storage.read_timestamp().is_err());
        storage.write_timestamp(7).unwrap();
        assert_eq!(storage.read_timestamp().unwrap(), Some(7));
    }

    #[test]
    fn test_non_integer_timestamp_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        fs::write(
            prefs_path(temp_dir.path()),
            r#"{"last_update_timestamp": "yesterday"}"#,
        )
        .unwrap();

        assert!(storage.read_timestamp().is_err());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert!(!storage.data_exists());

        storage.write_quotes(&[]).unwrap();
        assert!(storage.data_exists());
        assert_eq!(storage.read_quotes().unwrap(), Some(Vec::new()));

        let seeded = MemoryStorage::with_record(vec![Quote::new("A", "X", "life")], 5);
        assert!(seeded.data_exists());
        assert_eq!(seeded.read_timestamp().unwrap(), Some(5));
    }
}
