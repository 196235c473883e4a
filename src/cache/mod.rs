pub mod processed;

pub use processed::ProcessedCache;

use crate::config::Config;

pub fn init_cache(config: &Config) -> ProcessedCache {
    ProcessedCache::new(config.cache_max_capacity, config.cache_ttl)
}
