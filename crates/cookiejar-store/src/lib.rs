//! cookiejar store - JSON files as cross-process key-value stores
//!
//! A [`Cookies`] handle names one JSON file. Every operation re-reads or
//! rewrites the whole file while holding a named lock derived from the
//! file's path, so handles in other threads and processes see a consistent
//! document.
//!
//! ```no_run
//! use cookiejar_store::Cookies;
//!
//! # fn main() -> cookiejar_store::Result<()> {
//! let cookies = Cookies::user("my-game")?;
//! cookies.set("volume", 7)?;
//! let volume: Option<u32> = cookies.get_as("volume")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod fs;
pub mod lock;
pub mod paths;
pub mod store;

pub use config::{RecoveryPolicy, StoreConfig};
pub use cookiejar_core::{Entries, Escaping, ExError, ExErrorKind, JsonOptions};
pub use errors::Result;
pub use fs::{FileAccessor, LocalFs};
pub use lock::{NamedLock, NamedLockGuard};
pub use store::Cookies;
