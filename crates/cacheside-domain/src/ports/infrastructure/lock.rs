//! Distributed Lock Provider Port
//!
//! Defines the contract for the per-entity mutual exclusion used on the
//! cache-miss path. Locks expire on their own after their TTL.

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Lock guard token returned when a lock is acquired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockGuard {
    /// Lock key
    pub key: String,
    /// Unique token for this lock acquisition
    pub token: String,
}

/// Distributed lock provider interface
#[async_trait]
pub trait LockProvider: Send + Sync {
    /// Try once to acquire a lock that expires after `ttl`
    ///
    /// # Returns
    /// `Some(guard)` if acquired, `None` if another holder has it
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LockGuard>>;

    /// Release a lock
    ///
    /// Releasing a lock that already expired or was taken over by another
    /// holder is not an error; the other holder's lock is left in place.
    async fn release(&self, guard: LockGuard) -> Result<()>;
}
