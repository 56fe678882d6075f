use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    NotFound,

    // Document
    /// The store file exists but does not hold a JSON object
    CorruptDocument,
    /// A stored value does not have the shape the caller asked for
    Decode,
    Serialization,

    // Integration/IO
    Io,
    Timeout,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::CorruptDocument => "ERR_CORRUPT_DOCUMENT",
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the context
/// (operation, file path, key) needed to debug a failure.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    key: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            key: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add entry key context
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the entry key context, if any
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(key) = &self.key {
            write!(f, " (key: {})", key)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised by the codec and the store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CookieJarError {
    /// The named lock could not be taken before the deadline
    #[error("Timed out after {timeout_ms} ms waiting for lock {lock_path}")]
    LockTimeout { lock_path: PathBuf, timeout_ms: u64 },

    /// The lock file could not be opened or locked
    #[error("Lock {lock_path} unavailable: {reason}")]
    LockUnavailable { lock_path: PathBuf, reason: String },

    /// The store file holds something other than a JSON object
    #[error("Document at {path} is not a JSON object: {reason}")]
    CorruptDocument { path: PathBuf, reason: String },

    /// A stored value could not be decoded into the requested type
    #[error("Value for key '{key}' does not match the requested type: {reason}")]
    Decode { key: String, reason: String },

    /// File system access failed
    #[error("I/O error during {operation} on {path}: {reason}")]
    Io {
        operation: String,
        path: PathBuf,
        reason: String,
    },

    /// Serialization failed
    #[error("Serialization failed: {message}")]
    Serialization { message: String },

    /// Configuration could not be read or parsed
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A required location could not be resolved
    #[error("Could not resolve {what}")]
    Unresolvable { what: String },
}

impl From<CookieJarError> for ExError {
    fn from(err: CookieJarError) -> Self {
        match err {
            CookieJarError::LockTimeout {
                lock_path,
                timeout_ms,
            } => ExError::new(ExErrorKind::Timeout)
                .with_path(lock_path)
                .with_message(format!("Lock not acquired within {} ms", timeout_ms)),

            CookieJarError::LockUnavailable { lock_path, reason } => {
                ExError::new(ExErrorKind::Io)
                    .with_path(lock_path)
                    .with_message(format!("Lock unavailable: {}", reason))
            }

            CookieJarError::CorruptDocument { path, reason } => {
                ExError::new(ExErrorKind::CorruptDocument)
                    .with_path(path)
                    .with_message(reason)
            }

            CookieJarError::Decode { key, reason } => ExError::new(ExErrorKind::Decode)
                .with_key(key)
                .with_message(reason),

            CookieJarError::Io {
                operation,
                path,
                reason,
            } => ExError::new(ExErrorKind::Io)
                .with_op(operation)
                .with_path(path)
                .with_message(reason),

            CookieJarError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            CookieJarError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::Config).with_message(reason)
            }

            CookieJarError::Unresolvable { what } => ExError::new(ExErrorKind::NotFound)
                .with_message(format!("Could not resolve {}", what)),
        }
    }
}

/// Conversion from serde_json::Error to CookieJarError
impl From<serde_json::Error> for CookieJarError {
    fn from(err: serde_json::Error) -> Self {
        CookieJarError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from serde_json::Error to ExError
impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        CookieJarError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
            (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
            (ExErrorKind::CorruptDocument, "ERR_CORRUPT_DOCUMENT"),
            (ExErrorKind::Decode, "ERR_DECODE"),
            (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
            (ExErrorKind::Io, "ERR_IO"),
            (ExErrorKind::Timeout, "ERR_TIMEOUT"),
            (ExErrorKind::Config, "ERR_CONFIG"),
            (ExErrorKind::Internal, "ERR_INTERNAL"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::Timeout)
            .with_op("cookies_set")
            .with_path("/tmp/Cookies.json")
            .with_key("volume")
            .with_message("Lock not acquired within 5 ms");

        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_TIMEOUT] in operation 'cookies_set'"));
        assert!(rendered.contains("Lock not acquired within 5 ms"));
        assert!(rendered.contains("(path: /tmp/Cookies.json)"));
        assert!(rendered.contains("(key: volume)"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Internal).with_source(inner);

        let source = std::error::Error::source(&outer).expect("source should be set");
        assert!(source.to_string().contains("disk full"));
        assert_eq!(
            outer.source_error().map(ExError::kind),
            Some(ExErrorKind::Io)
        );
    }

    #[test]
    fn test_serde_json_error_maps_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ExError = json_err.into();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
