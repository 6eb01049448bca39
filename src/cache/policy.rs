// Fetch-or-serve policy for the quote list.
// Serves fresh cache, else fetches and persists, else falls back to whatever is stored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{FailureKind, FlipQuotesError};
use crate::feed::QuoteSource;
use crate::quotes::{Quote, fill_flipped};

use super::storage::CacheStorage;
use super::store::{CacheRecord, DEFAULT_TTL, is_within_ttl};

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Where a returned quote list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Served {
    /// Cache younger than the TTL; no network call.
    FreshCache,
    /// Fetched just now.
    Network,
    /// Fetch failed; served the stored record regardless of age.
    StaleCache,
    /// Fetch failed and nothing was stored.
    Nothing,
}

/// Lifecycle of the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Fresh,
    Stale,
}

/// Receives the failures the policy swallows and the outcome of each request.
pub trait CacheObserver: Send + Sync {
    fn on_failure(&self, kind: FailureKind, error: &FlipQuotesError);

    fn on_served(&self, _served: Served, _count: usize) {}
}

/// Observer that logs through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CacheObserver for TracingObserver {
    fn on_failure(&self, kind: FailureKind, error: &FlipQuotesError) {
        warn!(kind = kind.as_str(), error = %error, "Quote cache step failed");
    }

    fn on_served(&self, served: Served, count: usize) {
        match served {
            Served::Network => info!(count, "Fetched fresh quotes"),
            Served::StaleCache => warn!(count, "Serving stale cached quotes"),
            Served::Nothing => warn!("No quotes available"),
            Served::FreshCache => debug!(count, "Serving cached quotes"),
        }
    }
}

/// Local-first quote cache.
///
/// Callers only ever get a list of quotes, possibly empty. Every failure along the way is
/// reported to the observer and treated as "this step produced nothing".
///
/// At most one fetch runs at a time. A caller that waits behind a fetch serves what that
/// fetch stored instead of fetching again.
pub struct QuoteCache<S> {
    source: S,
    storage: Arc<dyn CacheStorage>,
    clock: Arc<dyn Clock>,
    observer: Arc<dyn CacheObserver>,
    ttl: Duration,
    fetch_lock: Mutex<()>,
    /// Bumped after every fully persisted fetch.
    generation: AtomicU64,
    /// Source of generated flips.
    rng: StdMutex<StdRng>,
}

impl<S: QuoteSource> QuoteCache<S> {
    pub fn new(source: S, storage: Arc<dyn CacheStorage>) -> Self {
        Self {
            source,
            storage,
            clock: Arc::new(SystemClock),
            observer: Arc::new(TracingObserver),
            ttl: DEFAULT_TTL,
            fetch_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            rng: StdMutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = StdMutex::new(rng);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn CacheObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Quotes from a fresh cache, else from the network, else from any stored record.
    pub async fn get_quotes(&self) -> Vec<Quote> {
        if let Some(quotes) = self.fresh_quotes() {
            return self.serve(Served::FreshCache, quotes);
        }

        let _guard = self.fetch_lock.lock().await;

        // Someone else may have refreshed while we waited.
        if let Some(quotes) = self.fresh_quotes() {
            return self.serve(Served::FreshCache, quotes);
        }

        self.fetch_or_fallback().await
    }

    /// Fetch from the network regardless of cache age, falling back to the stored record.
    pub async fn force_refresh(&self) -> Vec<Quote> {
        let seen = self.generation.load(Ordering::Acquire);
        let _guard = self.fetch_lock.lock().await;

        if self.generation.load(Ordering::Acquire) != seen {
            if let Some(quotes) = self.load_cached().filter(|q| !q.is_empty()) {
                return self.serve(Served::Network, quotes);
            }
        }

        self.fetch_or_fallback().await
    }

    /// Whether the last fetch happened less than one TTL ago.
    pub fn is_cache_valid(&self) -> bool {
        match self.storage.read_timestamp() {
            Ok(Some(fetched_at)) => is_within_ttl(fetched_at, self.clock.now_millis(), self.ttl),
            Ok(None) => false,
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Whether backing data exists for the timestamp.
    pub fn does_cache_exist(&self) -> bool {
        self.storage.data_exists()
    }

    pub fn state(&self) -> CacheState {
        if !self.does_cache_exist() {
            CacheState::Empty
        } else if self.is_cache_valid() {
            CacheState::Fresh
        } else {
            CacheState::Stale
        }
    }

    /// The stored record, if both data and timestamp can be read.
    pub fn record(&self) -> Option<CacheRecord> {
        let quotes = self.load_cached()?;
        let fetched_at = match self.storage.read_timestamp() {
            Ok(timestamp) => timestamp?,
            Err(e) => {
                self.report(&e);
                return None;
            }
        };
        Some(CacheRecord::new(quotes, fetched_at))
    }

    fn fresh_quotes(&self) -> Option<Vec<Quote>> {
        if !(self.is_cache_valid() && self.does_cache_exist()) {
            return None;
        }
        self.load_cached().filter(|quotes| !quotes.is_empty())
    }

    async fn fetch_or_fallback(&self) -> Vec<Quote> {
        match self.fetch_and_persist().await {
            Some(quotes) => self.serve(Served::Network, quotes),
            None => match self.load_cached() {
                Some(quotes) if !quotes.is_empty() => self.serve(Served::StaleCache, quotes),
                _ => self.serve(Served::Nothing, Vec::new()),
            },
        }
    }

    async fn fetch_and_persist(&self) -> Option<Vec<Quote>> {
        let mut quotes = match self.source.fetch_quotes().await {
            Ok(quotes) if !quotes.is_empty() => quotes,
            Ok(_) => {
                self.report(&FlipQuotesError::EmptyFeed);
                return None;
            }
            Err(e) => {
                self.report(&e);
                return None;
            }
        };

        self.fill_flips(&mut quotes);
        self.persist(&quotes);
        Some(quotes)
    }

    /// Write data, then the timestamp. A failed data write leaves the timestamp alone.
    fn persist(&self, quotes: &[Quote]) {
        let now = self.clock.now_millis();

        if let Err(e) = self.storage.write_quotes(quotes) {
            self.report(&e);
            return;
        }
        if let Err(e) = self.storage.write_timestamp(now) {
            self.report(&e);
            return;
        }

        self.generation.fetch_add(1, Ordering::Release);
    }

    fn load_cached(&self) -> Option<Vec<Quote>> {
        match self.storage.read_quotes() {
            Ok(Some(mut quotes)) => {
                self.fill_flips(&mut quotes);
                Some(quotes)
            }
            Ok(None) => None,
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    fn fill_flips(&self, quotes: &mut [Quote]) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        fill_flipped(quotes, &mut *rng);
    }

    fn report(&self, error: &FlipQuotesError) {
        self.observer.on_failure(error.kind(), error);
    }

    fn serve(&self, served: Served, quotes: Vec<Quote>) -> Vec<Quote> {
        self.observer.on_served(served, quotes.len());
        quotes
    }
}
