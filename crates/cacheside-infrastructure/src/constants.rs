//! Infrastructure constants

// ============================================================================
// Configuration
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "cacheside.toml";

/// Directory searched under the working and user config directories
pub const DEFAULT_CONFIG_DIR: &str = "cacheside";

/// Prefix of configuration environment variables (`CACHESIDE_CACHE__PROVIDER`)
pub const CONFIG_ENV_PREFIX: &str = "CACHESIDE";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// Logging
// ============================================================================

/// Environment variable holding a tracing filter that overrides the configured level
pub const LOG_ENV_VAR: &str = "CACHESIDE_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File stem used when the configured log path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "cacheside";

// ============================================================================
// Providers
// ============================================================================

/// Default cache provider
pub const DEFAULT_CACHE_PROVIDER: &str = "moka";

/// Default store provider
pub const DEFAULT_STORE_PROVIDER: &str = "memory";

/// Store provider that needs a connection URI
pub const MONGO_STORE_PROVIDER: &str = "mongo";
