//! Configuration types module

pub mod app;
pub mod cache;
pub mod lock;
pub mod logging;
pub mod store;

pub use app::AppConfig;
pub use cache::CacheConfig;
pub use lock::LockConfig;
pub use logging::LoggingConfig;
pub use store::StoreConfig;
