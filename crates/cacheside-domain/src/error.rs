//! Error handling types
//!
//! One error enum is shared by every layer. Variants fall into three groups:
//!
//! | Group | Variants | Caller sees |
//! |-------|----------|-------------|
//! | Domain | `NotFound`, `InvalidArgument`, `Conflict`, `LockContention` | unchanged |
//! | Transient infrastructure | `Cache` | never (absorbed by the access layer) |
//! | Unclassified | everything else | wrapped into `Internal` |

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error carried by infrastructure variants
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for Cacheside
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to a function (malformed identifier, bad input)
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Write rejected by a store constraint (duplicate key and similar)
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict
        message: String,
    },

    /// Gave up waiting for a stampede lock held by another caller
    #[error("Lock contention on {key}: gave up after {attempts} attempts ({waited_ms}ms)")]
    LockContention {
        /// The lock key that stayed held
        key: String,
        /// Number of lock attempts made
        attempts: u32,
        /// Time spent waiting in milliseconds
        waited_ms: u64,
    },

    /// Cache or lock backend operation error
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Persistent store error
    #[error("Database error: {message}")]
    Database {
        /// Description of the database error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedSource>,
    },
}

// Domain error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a lock contention error
    pub fn lock_contention<S: Into<String>>(key: S, attempts: u32, waited_ms: u64) -> Self {
        Self::LockContention {
            key: key.into(),
            attempts,
            waited_ms,
        }
    }
}

// Cache error creation methods
impl Error {
    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
            source: None,
        }
    }

    /// Create a cache error with source
    pub fn cache_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Cache {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Database error creation methods
impl Error {
    /// Create a database error
    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Create a database error with source
    pub fn database_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Configuration, infrastructure and internal error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }
}

// Classification
impl Error {
    /// Whether this is a domain-known failure that callers handle by kind
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::InvalidArgument { .. }
                | Self::Conflict { .. }
                | Self::LockContention { .. }
        )
    }

    /// Whether this is a transient cache/lock backend failure
    pub fn is_transient_infra(&self) -> bool {
        matches!(self, Self::Cache { .. })
    }

    /// Apply the operation boundary policy.
    ///
    /// Domain failures and errors that are already [`Error::Internal`] pass
    /// through unchanged. Anything else becomes [`Error::Internal`] naming
    /// the operation and target, with the original error kept as the source.
    #[must_use]
    pub fn classify(self, operation: &str, target: &str) -> Self {
        if self.is_domain() || matches!(self, Self::Internal { .. }) {
            return self;
        }
        Self::Internal {
            message: format!("{operation} failed for {target}: {self}"),
            source: Some(Box::new(self)),
        }
    }

    /// HTTP status class for the error-translation boundary
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidArgument { .. } => 400,
            Self::Conflict { .. } => 409,
            Self::LockContention { .. } => 503,
            _ => 500,
        }
    }
}
