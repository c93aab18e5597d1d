//! Stampede lock configuration types

use std::time::Duration;

use cacheside_application::RetryPolicy;
use cacheside_application::retry::{
    DEFAULT_BASE_DELAY, DEFAULT_JITTER, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY, DEFAULT_MAX_WAIT,
    DEFAULT_MULTIPLIER,
};
use cacheside_domain::constants::DEFAULT_LOCK_TTL_SECS;
use serde::{Deserialize, Serialize};

/// Lock and backoff configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Lifetime of a stampede lock in seconds
    pub ttl_secs: u64,

    /// Maximum lock attempts per read
    pub max_attempts: u32,

    /// Delay after the first lost attempt
    pub base_delay_ms: u64,

    /// Cap on a single delay
    pub max_delay_ms: u64,

    /// Growth factor between delays
    pub multiplier: f64,

    /// Upper bound of the random jitter
    pub jitter_ms: u64,

    /// Total time a read may wait on a held lock
    pub max_wait_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_LOCK_TTL_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: millis(DEFAULT_BASE_DELAY),
            max_delay_ms: millis(DEFAULT_MAX_DELAY),
            multiplier: DEFAULT_MULTIPLIER,
            jitter_ms: millis(DEFAULT_JITTER),
            max_wait_ms: millis(DEFAULT_MAX_WAIT),
        }
    }
}

impl LockConfig {
    /// Lock lifetime
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Backoff schedule for callers that find the lock held
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            multiplier: self.multiplier,
            jitter: Duration::from_millis(self.jitter_ms),
            max_wait: Duration::from_millis(self.max_wait_ms),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
