//! Domain layer constants
//!
//! Values that are part of the cache-aside contract itself. Infrastructure
//! tunables live in `cacheside_infrastructure::constants`.

/// Default TTL for cached entity snapshots (1 hour)
pub const DEFAULT_DATA_TTL_SECS: u64 = 3600;

/// Default TTL for stampede locks
pub const DEFAULT_LOCK_TTL_SECS: u64 = 10;

/// Separator between cache key segments
pub const CACHE_KEY_SEPARATOR: &str = ":";

/// Suffix appended to a cache key to form its lock key
pub const LOCK_KEY_SUFFIX: &str = "lock";

/// Prefix of every lock token value
pub const LOCK_TOKEN_SENTINEL: &str = "locked";

/// Length of a store identifier in hex characters
pub const ENTITY_ID_HEX_LEN: usize = 24;
