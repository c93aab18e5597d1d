//! Bounded backoff for callers that lose the lock race

use rand::Rng;
use std::time::Duration;

/// Default number of lock attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// Default delay after the first lost attempt
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(50);

/// Default cap on a single delay
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(500);

/// Default growth factor between delays
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Default upper bound of the random jitter added to each delay
pub const DEFAULT_JITTER: Duration = Duration::from_millis(25);

/// Default total time a caller may spend waiting on a held lock
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(5);

/// Backoff schedule with both an attempt cap and a wait deadline
///
/// The delay after attempt `n` is `base * multiplier^(n-1)`, capped at
/// `max_delay`, plus a uniform jitter in `[0, jitter]`. A multiplier of 1.0
/// gives a fixed interval.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of lock attempts
    pub max_attempts: u32,
    /// Delay after the first lost attempt
    pub base_delay: Duration,
    /// Cap on a single delay (before jitter)
    pub max_delay: Duration,
    /// Growth factor between delays
    pub multiplier: f64,
    /// Upper bound of the random jitter
    pub jitter: Duration,
    /// Total wait budget measured from the first attempt
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            jitter: DEFAULT_JITTER,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl RetryPolicy {
    /// Fixed interval without jitter
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: interval,
            max_delay: interval,
            multiplier: 1.0,
            jitter: Duration::ZERO,
            max_wait: interval.saturating_mul(max_attempts),
        }
    }

    /// Set the wait deadline
    #[must_use]
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Set the jitter bound
    #[must_use]
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Deterministic part of the delay after `attempt` (1-based)
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let scaled = self.base_delay.as_nanos() as f64 * self.multiplier.powi(exponent);
        let capped = scaled.min(self.max_delay.as_nanos() as f64).max(0.0);
        Duration::from_nanos(capped.round() as u64)
    }

    /// Delay before the next attempt, or `None` once the budget is spent
    ///
    /// The returned delay never runs past the deadline, so the last attempt
    /// happens at `max_wait` at the latest.
    pub fn next_delay(&self, attempt: u32, elapsed: Duration) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let remaining = self.max_wait.checked_sub(elapsed)?;
        if remaining.is_zero() {
            return None;
        }
        let delay = self.backoff_delay(attempt) + self.sample_jitter();
        Some(delay.min(remaining))
    }

    fn sample_jitter(&self) -> Duration {
        let bound = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if bound == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=bound))
    }
}
