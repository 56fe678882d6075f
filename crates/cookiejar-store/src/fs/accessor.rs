//! File accessor seam

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::Path;

use super::atomic::atomic_write;

/// File operations the store performs on its document
///
/// Implementations must be safe to share across threads. The store holds
/// the named lock around every call.
pub trait FileAccessor: Send + Sync + Debug {
    /// Read the whole file as UTF-8; `Ok(None)` when it does not exist
    fn read_to_string(&self, path: &Path) -> io::Result<Option<String>>;

    /// Replace the file's contents wholesale
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Whether the file is present
    fn exists(&self, path: &Path) -> bool;

    /// Remove the file
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Local file system with atomic temp-then-rename writes
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileAccessor for LocalFs {
    fn read_to_string(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        atomic_write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let result = LocalFs.read_to_string(&dir.path().join("missing.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_write_read_exists_remove() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Cookies.json");

        LocalFs.write(&path, b"{}").unwrap();
        assert!(LocalFs.exists(&path));
        assert_eq!(LocalFs.read_to_string(&path).unwrap().as_deref(), Some("{}"));

        LocalFs.remove(&path).unwrap();
        assert!(!LocalFs.exists(&path));
        assert!(LocalFs.remove(&path).is_err());
    }

    #[test]
    fn test_directory_is_not_a_store_file() {
        let dir = TempDir::new().unwrap();
        assert!(!LocalFs.exists(dir.path()));
    }
}
