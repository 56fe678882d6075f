//! Cross-process named lock backed by an OS advisory file lock

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs4::FileExt;

use crate::errors::{lock_timeout, lock_unavailable, Result};

const INITIAL_BACKOFF: Duration = Duration::from_millis(1);
const MAX_BACKOFF: Duration = Duration::from_millis(50);

/// Lock file path derived from a store path: `<path>.lock`
///
/// Every handle naming the same store path derives the same lock name.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// A mutual-exclusion primitive named by a file path
///
/// The lock is held on an open handle, so two acquisitions from the same
/// process on different handles exclude each other just like two processes
/// do. The OS drops the lock if the holder exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedLock {
    lock_path: PathBuf,
}

impl NamedLock {
    /// Lock guarding the store file at `path`
    pub fn for_store(path: &Path) -> Self {
        Self {
            lock_path: lock_path_for(path),
        }
    }

    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Block until the lock is held or `timeout` elapses
    ///
    /// Creates the lock file and its parent directories when missing. A zero
    /// timeout makes a single attempt.
    pub fn acquire(&self, timeout: Duration) -> Result<NamedLockGuard> {
        let file = match self.open_existing()? {
            Some(file) => file,
            None => self.create()?,
        };
        self.wait_for(file, timeout)
    }

    /// Like `acquire`, but never creates anything on disk
    ///
    /// Returns `Ok(None)` when the lock file does not exist. No writer has
    /// locked this path yet in that case, and writes replace the store file
    /// by rename, so an unlocked read still sees a whole document.
    pub fn acquire_existing(&self, timeout: Duration) -> Result<Option<NamedLockGuard>> {
        match self.open_existing()? {
            Some(file) => self.wait_for(file, timeout).map(Some),
            None => Ok(None),
        }
    }

    fn wait_for(&self, file: File, timeout: Duration) -> Result<NamedLockGuard> {
        let started = Instant::now();
        let deadline = started + timeout;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => {
                    tracing::debug!(
                        lock_path = %self.lock_path.display(),
                        wait_ms = started.elapsed().as_millis() as u64,
                        "named lock acquired"
                    );
                    return Ok(NamedLockGuard {
                        file,
                        lock_path: self.lock_path.clone(),
                        acquired_at: Instant::now(),
                    });
                }
                Err(err) if is_contended(&err) => {
                    let now = Instant::now();
                    if now >= deadline {
                        tracing::warn!(
                            lock_path = %self.lock_path.display(),
                            timeout_ms = timeout.as_millis() as u64,
                            "named lock not acquired before deadline"
                        );
                        return Err(lock_timeout(&self.lock_path, timeout));
                    }
                    thread::sleep(backoff.min(deadline - now));
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(err) => return Err(lock_unavailable(&self.lock_path, err)),
            }
        }
    }

    /// Open an existing lock file, read-only if it is not writable
    fn open_existing(&self) -> Result<Option<File>> {
        match OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.lock_path)
        {
            Ok(file) => Ok(Some(file)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                File::open(&self.lock_path)
                    .map(Some)
                    .map_err(|err| lock_unavailable(&self.lock_path, err))
            }
            Err(err) => Err(lock_unavailable(&self.lock_path, err)),
        }
    }

    fn create(&self) -> Result<File> {
        if let Some(parent) = self.lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| lock_unavailable(&self.lock_path, err))?;
            }
        }

        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|err| lock_unavailable(&self.lock_path, err))
    }
}

/// Proof of holding a `NamedLock`; released on drop
#[derive(Debug)]
pub struct NamedLockGuard {
    file: File,
    lock_path: PathBuf,
    acquired_at: Instant,
}

impl NamedLockGuard {
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for NamedLockGuard {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            // Closing the handle still releases it
            tracing::debug!(
                lock_path = %self.lock_path.display(),
                error = %err,
                "explicit unlock failed"
            );
        }
        tracing::debug!(
            lock_path = %self.lock_path.display(),
            held_ms = self.acquired_at.elapsed().as_millis() as u64,
            "named lock released"
        );
    }
}

fn is_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }
    #[cfg(windows)]
    {
        const ERROR_LOCK_VIOLATION: i32 = 33;
        if err.raw_os_error() == Some(ERROR_LOCK_VIOLATION) {
            return true;
        }
    }
    false
}
