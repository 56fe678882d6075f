//! The file-backed key-value store
//!
//! Every public operation:
//! 1. Logs a start event
//! 2. Acquires the store's named lock (reads only when its file exists)
//! 3. Runs a lock-free core (`*_impl`) that may call other cores
//! 4. Releases the lock and logs end or end_error
//!
//! Composite operations (`set`, `get`) call the cores directly so the lock
//! is taken once per public call and never re-entered.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use cookiejar_core::codec;
use cookiejar_core::model::{apply_set, lookup};
use cookiejar_core::{log_op_end, log_op_error, log_op_start, Entries, ExError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{RecoveryPolicy, StoreConfig};
use crate::errors::{corrupt_document, io_error, Result};
use crate::fs::{FileAccessor, LocalFs};
use crate::lock::NamedLock;
use crate::paths;

/// Whether an operation may create files on disk
///
/// Reads never create the lock file or its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// A handle on one JSON store file
///
/// Handles are cheap to clone and hold no open resources between calls.
/// Any number of handles, in any number of threads or processes, may name
/// the same path; the named lock serializes their operations.
#[derive(Debug, Clone)]
pub struct Cookies {
    path: PathBuf,
    config: StoreConfig,
    lock: NamedLock,
    accessor: Arc<dyn FileAccessor>,
}

impl Cookies {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, StoreConfig::default())
    }

    pub fn with_config(path: impl Into<PathBuf>, config: StoreConfig) -> Self {
        let path = path.into();
        Self {
            lock: NamedLock::for_store(&path),
            path,
            config,
            accessor: Arc::new(LocalFs),
        }
    }

    /// Store in the per-user data directory of `app_name`
    ///
    /// # Errors
    ///
    /// See [`paths::user_store_path`].
    pub fn user(app_name: &str) -> Result<Self> {
        Ok(Self::new(paths::user_store_path(app_name)?))
    }

    /// Replace the file accessor, e.g. with an in-memory or failing one
    pub fn with_accessor(mut self, accessor: Arc<dyn FileAccessor>) -> Self {
        self.accessor = accessor;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn lock_path(&self) -> &Path {
        self.lock.lock_path()
    }

    /// Replace the whole file with `entries`
    ///
    /// Returns `Ok(false)` when the file could not be written.
    ///
    /// # Errors
    ///
    /// `Timeout` if the lock is not acquired in time.
    pub fn set_all(&self, entries: &Entries) -> Result<bool> {
        self.run("cookies_set_all", Access::Write, None, || self.set_all_impl(entries))
    }

    /// Read the whole file
    ///
    /// A missing or empty file is an empty set. An unreadable or corrupt
    /// file follows the configured [`RecoveryPolicy`].
    ///
    /// # Errors
    ///
    /// `Timeout` if the lock is not acquired in time; `CorruptDocument` or
    /// `Io` under [`RecoveryPolicy::Fail`].
    pub fn get_all(&self) -> Result<Entries> {
        self.run("cookies_get_all", Access::Read, None, || self.get_all_impl())
    }

    /// Set one key, or remove it when `value` serializes to `null`
    ///
    /// The read-modify-write happens under a single lock acquisition.
    ///
    /// # Errors
    ///
    /// `Serialization` if `value` cannot be represented as JSON, otherwise
    /// as [`Cookies::get_all`].
    pub fn set<T: Serialize>(&self, key: &str, value: T) -> Result<bool> {
        let value = codec::encode_value(value).map_err(|err| err.with_key(key))?;
        self.run("cookies_set", Access::Write, Some(key), || self.set_impl(key, value))
    }

    /// Raw value stored under `key`; `None` when absent or `null`
    ///
    /// # Errors
    ///
    /// As [`Cookies::get_all`].
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.run("cookies_get", Access::Read, Some(key), || self.get_impl(key))
    }

    /// Value stored under `key`, decoded into `T`
    ///
    /// # Errors
    ///
    /// `Decode` when the stored value does not fit `T`, otherwise as
    /// [`Cookies::get_all`].
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.run("cookies_get_as", Access::Read, Some(key), || {
            self.get_impl(key)?
                .map(|value| codec::decode_value(key, value))
                .transpose()
        })
    }

    /// Remove the store file
    ///
    /// Returns `Ok(false)` when there was nothing to remove or removal
    /// failed. The lock file is left in place for other handles.
    ///
    /// # Errors
    ///
    /// `Timeout` if the lock is not acquired in time.
    pub fn delete(&self) -> Result<bool> {
        self.run("cookies_delete", Access::Write, None, || self.delete_impl())
    }

    /// Whether the store file is present
    ///
    /// # Errors
    ///
    /// `Timeout` if the lock is not acquired in time.
    pub fn exists(&self) -> Result<bool> {
        self.run("cookies_exists", Access::Read, None, || Ok(self.accessor.exists(&self.path)))
    }

    fn run<T>(
        &self,
        op: &'static str,
        access: Access,
        key: Option<&str>,
        body: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let path = self.path.display().to_string();
        log_op_start!(op, path = %path, key = key);
        let start = Instant::now();

        let timeout = self.config.lock_timeout();
        let result = match access {
            Access::Write => self.lock.acquire(timeout).and_then(|_guard| body()),
            Access::Read => self
                .lock
                .acquire_existing(timeout)
                .and_then(|_guard| body()),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(value) => {
                log_op_end!(op, duration_ms = duration_ms, path = %path, key = key);
                Ok(value)
            }
            Err(err) => {
                let err = match key {
                    Some(key) if err.key().is_none() => err.with_key(key),
                    _ => err,
                };
                log_op_error!(
                    op,
                    err.clone(),
                    duration_ms = duration_ms,
                    path = %path,
                    key = key
                );
                Err(err)
            }
        }
    }

    fn get_all_impl(&self) -> Result<Entries> {
        let text = match self.accessor.read_to_string(&self.path) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(Entries::new()),
            Err(err) => return self.recover(io_error("read", &self.path, err)),
        };

        if text.trim().is_empty() {
            return Ok(Entries::new());
        }

        match codec::deserialize(&text, &self.config.json) {
            Ok(entries) => {
                tracing::debug!(
                    path = %self.path.display(),
                    entry_count = entries.len(),
                    "store file read"
                );
                Ok(entries)
            }
            Err(err) => self.recover(
                corrupt_document(&self.path, err.message()).with_op("deserialize"),
            ),
        }
    }

    fn set_all_impl(&self, entries: &Entries) -> Result<bool> {
        let text =
            codec::serialize(entries, &self.config.json).map_err(|err| err.with_path(&self.path))?;

        match self.accessor.write(&self.path, text.as_bytes()) {
            Ok(()) => {
                tracing::debug!(
                    path = %self.path.display(),
                    entry_count = entries.len(),
                    bytes = text.len(),
                    "store file written"
                );
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "store file could not be written"
                );
                Ok(false)
            }
        }
    }

    fn set_impl(&self, key: &str, value: Value) -> Result<bool> {
        let mut entries = self.get_all_impl()?;
        apply_set(&mut entries, key, value);
        self.set_all_impl(&entries)
    }

    fn get_impl(&self, key: &str) -> Result<Option<Value>> {
        let entries = self.get_all_impl()?;
        Ok(lookup(&entries, key).cloned())
    }

    fn delete_impl(&self) -> Result<bool> {
        if !self.accessor.exists(&self.path) {
            return Ok(false);
        }
        match self.accessor.remove(&self.path) {
            Ok(()) => Ok(true),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "store file could not be removed"
                );
                Ok(false)
            }
        }
    }

    fn recover(&self, err: ExError) -> Result<Entries> {
        match self.config.recovery {
            RecoveryPolicy::ResetToEmpty => {
                tracing::warn!(
                    path = %self.path.display(),
                    err.code = err.code(),
                    reason = %err,
                    "unreadable store file treated as empty"
                );
                Ok(Entries::new())
            }
            RecoveryPolicy::Fail => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> Cookies {
        Cookies::new(dir.path().join("Cookies.json"))
    }

    #[test]
    fn test_lock_path_sits_beside_store() {
        let dir = TempDir::new().unwrap();
        let cookies = store_in(&dir);
        assert_eq!(cookies.lock_path(), dir.path().join("Cookies.json.lock"));
    }

    #[test]
    fn test_set_then_get_under_one_lock() {
        let dir = TempDir::new().unwrap();
        let cookies = store_in(&dir);

        assert!(cookies.set("volume", 7).unwrap());

        assert_eq!(cookies.get("volume").unwrap(), Some(json!(7)));
    }

    #[test]
    fn test_set_null_removes_key() {
        let dir = TempDir::new().unwrap();
        let cookies = store_in(&dir);
        cookies.set("volume", 7).unwrap();

        cookies.set("volume", Value::Null).unwrap();

        assert!(cookies.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_whitespace_file_is_empty_set() {
        let dir = TempDir::new().unwrap();
        let cookies = Cookies::with_config(
            dir.path().join("Cookies.json"),
            StoreConfig::default().with_recovery(RecoveryPolicy::Fail),
        );
        std::fs::write(cookies.path(), " \n\t").unwrap();

        assert!(cookies.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_reads_leave_no_trace() {
        // Given: a store in a directory that does not exist
        let dir = TempDir::new().unwrap();
        let cookies = Cookies::new(dir.path().join("app").join("Cookies.json"));

        // When: only reading
        assert!(!cookies.exists().unwrap());
        assert!(cookies.get_all().unwrap().is_empty());
        assert_eq!(cookies.get("volume").unwrap(), None);

        // Then: neither the directory nor the lock file was created
        assert!(!dir.path().join("app").exists());
        assert!(!cookies.lock_path().exists());
    }

    #[test]
    fn test_delete_missing_file_is_false() {
        let dir = TempDir::new().unwrap();
        assert!(!store_in(&dir).delete().unwrap());
    }
}
