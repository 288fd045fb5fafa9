//! Cache Module
//!
//! Disk cache for upstream responses: key derivation, entry storage with
//! time-based expiry, and activity counters.

mod key;
mod stats;
mod store;


// Re-export public types
pub use key::{key_for, CacheKey, ENTRY_EXTENSION, KEY_LENGTH};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::CacheStore;

// == Public Constants ==
/// Name of the cache directory created next to the executable
pub const CACHE_DIR_NAME: &str = "cache";
