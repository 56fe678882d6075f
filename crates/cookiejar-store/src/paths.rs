//! Default store locations

use std::path::PathBuf;

use cookiejar_core::errors::{CookieJarError, ExError, ExErrorKind};
use directories::BaseDirs;

use crate::errors::Result;

/// File name used for a per-user store
pub const DEFAULT_FILE_NAME: &str = "Cookies.json";

/// Per-user data directory for `app_name`
///
/// `~/.local/share/<app>` on Linux, `~/Library/Application Support/<app>`
/// on macOS, `%LOCALAPPDATA%\<app>` on Windows.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty name or one containing a path
/// separator, and `NotFound` when the platform has no home directory.
pub fn user_data_dir(app_name: &str) -> Result<PathBuf> {
    validate_app_name(app_name)?;
    let base = BaseDirs::new().ok_or_else(|| {
        ExError::from(CookieJarError::Unresolvable {
            what: "user data directory".to_string(),
        })
        .with_op("user_data_dir")
    })?;
    Ok(base.data_local_dir().join(app_name))
}

/// `<user data dir>/<app_name>/Cookies.json`
///
/// # Errors
///
/// As `user_data_dir`.
pub fn user_store_path(app_name: &str) -> Result<PathBuf> {
    Ok(user_data_dir(app_name)?.join(DEFAULT_FILE_NAME))
}

fn validate_app_name(app_name: &str) -> Result<()> {
    let trimmed = app_name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("user_data_dir")
            .with_message("application name must not be empty"));
    }
    if app_name.contains(['/', '\\']) {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("user_data_dir")
            .with_message(format!(
                "application name must not contain a path separator: {}",
                app_name
            )));
    }
    Ok(())
}
