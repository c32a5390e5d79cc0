//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use chrono::{DateTime, Utc};
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Every variant is a local, synchronous argument failure. The cache performs
/// no I/O, so there are no transient or retriable failure modes; errors
/// propagate directly to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A TTL that resolved to zero
    #[error("TTL must be positive, got {0:?}")]
    ZeroTtl(std::time::Duration),

    /// An absolute expiry deadline that is not in the future
    #[error("deadline {0} has already elapsed")]
    ElapsedDeadline(DateTime<Utc>),

    /// Key not found (strict removal path only)
    #[error("key not found: {0}")]
    NotFound(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
