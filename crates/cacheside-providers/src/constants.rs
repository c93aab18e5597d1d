//! Provider-specific constants

// ============================================================================
// CACHE PROVIDER CONSTANTS
// ============================================================================

/// Default maximum number of entries in the moka cache
pub const MOKA_DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Default Redis connection URI
pub const REDIS_DEFAULT_URI: &str = "redis://localhost:6379";

/// Compare-and-delete used to release a lock only while it holds our token
pub const REDIS_RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

// ============================================================================
// STORE PROVIDER CONSTANTS
// ============================================================================

/// Default MongoDB database name
pub const MONGO_DEFAULT_DATABASE: &str = "cacheside";

/// Server selection and connect timeout appended to MongoDB URIs
pub const MONGO_TIMEOUT_PARAMS: &str = "serverSelectionTimeoutMS=3000&connectTimeoutMS=3000";

/// MongoDB duplicate key error marker
pub const MONGO_DUPLICATE_KEY_MARKER: &str = "E11000";
