//! Configuration loader
//!
//! Loads [`AppConfig`] from defaults, a TOML file and `CACHESIDE_*`
//! environment variables, then validates it.

use std::env;
use std::path::{Path, PathBuf};

use cacheside_application::ports::registry::{list_cache_providers, list_store_providers};
use cacheside_domain::error::{Error, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};

use crate::config::{AppConfig, CacheConfig, LockConfig, LoggingConfig, StoreConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
    MONGO_STORE_PROVIDER,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Later sources override earlier ones:
    /// 1. `AppConfig::default()`
    /// 2. The TOML file (explicit path, or the first `cacheside.toml` found)
    /// 3. Environment variables, `__` separating nested keys
    ///    (e.g. `CACHESIDE_LOCK__TTL_SECS=30`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        figment = figment.merge(
            Env::prefixed(&format!("{}_", self.env_prefix)).split(CONFIG_ENV_SEPARATOR),
        );

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;
        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

/// Validate application configuration
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(&config.logging)?;
    validate_cache_config(&config.cache)?;
    validate_lock_config(&config.lock)?;
    validate_store_config(&config.store)?;
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level).map(|_| ())
}

fn validate_cache_config(config: &CacheConfig) -> Result<()> {
    if config.data_ttl_secs == 0 {
        return Err(Error::configuration("Cache data TTL cannot be 0"));
    }
    let registered: Vec<&str> = list_cache_providers().into_iter().map(|(name, _)| name).collect();
    if !registered.contains(&config.provider.as_str()) {
        return Err(Error::configuration(format!(
            "Unknown cache provider '{}'. Available providers: {registered:?}",
            config.provider
        )));
    }
    Ok(())
}

fn validate_lock_config(config: &LockConfig) -> Result<()> {
    if config.ttl_secs == 0 {
        return Err(Error::configuration("Lock TTL cannot be 0"));
    }
    if config.max_attempts == 0 {
        return Err(Error::configuration("Lock max_attempts cannot be 0"));
    }
    if config.multiplier < 1.0 {
        return Err(Error::configuration(format!(
            "Lock backoff multiplier must be at least 1.0, got {}",
            config.multiplier
        )));
    }
    if config.base_delay_ms > config.max_delay_ms {
        return Err(Error::configuration(
            "Lock base_delay_ms cannot exceed max_delay_ms",
        ));
    }
    // Lock has to outlive the longest wait
    if config.ttl_secs.saturating_mul(1000) <= config.max_wait_ms {
        return Err(Error::configuration(format!(
            "Lock TTL ({}s) must be longer than max_wait_ms ({}ms)",
            config.ttl_secs, config.max_wait_ms
        )));
    }
    Ok(())
}

fn validate_store_config(config: &StoreConfig) -> Result<()> {
    let registered: Vec<&str> = list_store_providers().into_iter().map(|(name, _)| name).collect();
    if !registered.contains(&config.provider.as_str()) {
        return Err(Error::configuration(format!(
            "Unknown store provider '{}'. Available providers: {registered:?}",
            config.provider
        )));
    }
    if config.provider == MONGO_STORE_PROVIDER && config.uri.is_none() {
        return Err(Error::configuration(
            "Store provider 'mongo' requires store.uri",
        ));
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set logging configuration
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set cache configuration
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = cache;
        self
    }

    /// Set lock configuration
    #[must_use]
    pub fn with_lock(mut self, lock: LockConfig) -> Self {
        self.config.lock = lock;
        self
    }

    /// Set store configuration
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Build the configuration without validation
    pub fn build(self) -> AppConfig {
        self.config
    }

    /// Build and validate the configuration
    pub fn build_validated(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}
