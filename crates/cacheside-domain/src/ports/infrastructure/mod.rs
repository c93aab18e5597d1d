//! Infrastructure ports

pub mod lock;

pub use lock::{LockGuard, LockProvider};
