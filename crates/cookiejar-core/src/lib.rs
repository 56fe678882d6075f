//! cookiejar core - entry model, JSON codec, errors and logging
//!
//! This crate holds everything the store needs that does not touch the
//! file system:
//! - The entry set model (`Entries`) and set/remove semantics
//! - The JSON codec: tab-indented writer, tolerant reader, typed decode
//! - The structured error facility (`ExError`, `ExErrorKind`)
//! - The structured logging facility and its test capture mode

pub mod codec;
pub mod errors;
pub mod logging_facility;
pub mod model;

pub use cookiejar_core_types::schema;

// Re-export commonly used types
pub use codec::{Escaping, JsonOptions};
pub use errors::{CookieJarError, ExError, ExErrorKind, Result};
pub use model::Entries;
