// Cache module for local filesystem caching.
// Keeps the last fetched quote list on disk and decides when to go back to the network.

pub mod paths;
pub mod policy;
pub mod storage;
pub mod store;

pub use policy::{
    CacheObserver, CacheState, Clock, QuoteCache, Served, SystemClock, TracingObserver,
};
pub use storage::{CacheStorage, FileStorage, MemoryStorage};
pub use store::{CacheRecord, DEFAULT_TTL, read_json, write_json};
