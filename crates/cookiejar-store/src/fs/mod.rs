//! File system access for store documents
//!
//! Provides:
//! - `FileAccessor`, the seam the store reads and writes through
//! - `LocalFs`, the default implementation
//! - Atomic temp→rename writes

mod accessor;
mod atomic;

pub use accessor::{FileAccessor, LocalFs};
pub use atomic::{atomic_write, temp_path_for};
