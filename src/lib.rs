pub mod cache;
pub mod config;
pub mod lookup;

pub use cache::{Blank, Cache, CacheEntry, CacheError, Clock, ManualClock, SystemClock, TtlCache};
pub use config::{CacheConfig, ConfigError};
pub use lookup::{clear_cache, CachingLookup, FnLookup, Lookup};
