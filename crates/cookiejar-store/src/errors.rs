//! Error handling for cookiejar-store
//!
//! Wraps cookiejar-core ExError with store-specific helpers

use std::path::Path;
use std::time::Duration;

use cookiejar_core::errors::{CookieJarError, ExError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    CookieJarError::Io {
        operation: operation.to_string(),
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
    .into()
}

/// Create a lock timeout error
pub fn lock_timeout(lock_path: &Path, timeout: Duration) -> ExError {
    CookieJarError::LockTimeout {
        lock_path: lock_path.to_path_buf(),
        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    }
    .into()
}

/// Create an error for a lock file that cannot be opened or locked
pub fn lock_unavailable(lock_path: &Path, err: std::io::Error) -> ExError {
    CookieJarError::LockUnavailable {
        lock_path: lock_path.to_path_buf(),
        reason: err.to_string(),
    }
    .into()
}

/// Create an error for a store file that does not hold a JSON object
pub fn corrupt_document(path: &Path, reason: impl std::fmt::Display) -> ExError {
    CookieJarError::CorruptDocument {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
    .into()
}

/// Create a configuration error
pub fn config_error(reason: impl std::fmt::Display) -> ExError {
    CookieJarError::InvalidConfig {
        reason: reason.to_string(),
    }
    .into()
}
