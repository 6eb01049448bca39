// Liked and bookmarked quotes.
// Marks are keyed by quote text and author so they survive shuffles and theme changes.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::cache::store;
use crate::error::Result;

use super::types::{Quote, QuoteKey};

/// Which kind of mark a set holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Like,
    Bookmark,
}

impl MarkKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            MarkKind::Like => "likes.json",
            MarkKind::Bookmark => "bookmarks.json",
        }
    }

    /// Location of this set inside `data_dir`.
    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }
}

/// A set of marked quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkSet {
    keys: BTreeSet<QuoteKey>,
}

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a set from `path`. A missing file is an empty set.
    pub fn load(path: &Path) -> Result<Self> {
        let keys: Option<Vec<QuoteKey>> = store::read_json(path)?;
        Ok(Self {
            keys: keys.unwrap_or_default().into_iter().collect(),
        })
    }

    /// Persist the set to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let keys: Vec<&QuoteKey> = self.keys.iter().collect();
        store::write_json(path, &keys)
    }

    /// Flip the mark on `quote`. Returns whether it is marked afterwards.
    pub fn toggle(&mut self, quote: &Quote) -> bool {
        let key = quote.key();
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    pub fn contains(&self, quote: &Quote) -> bool {
        self.keys.contains(&quote.key())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The marked quotes among `quotes`, in their list order.
    pub fn select<'a>(&self, quotes: &'a [Quote]) -> Vec<&'a Quote> {
        quotes.iter().filter(|q| self.contains(q)).collect()
    }
}
