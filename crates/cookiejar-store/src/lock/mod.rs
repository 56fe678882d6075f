//! Cross-process locking for store files

mod named_lock;

pub use named_lock::{lock_path_for, NamedLock, NamedLockGuard};
