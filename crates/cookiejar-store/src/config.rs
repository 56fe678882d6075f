//! Store configuration
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! lock_timeout_ms = 5000
//! recovery = "reset_to_empty"
//!
//! [json]
//! indent_char = "\t"
//! indent_size = 1
//! escaping = "relaxed"
//! ```

use std::path::Path;
use std::time::Duration;

use cookiejar_core::JsonOptions;
use serde::{Deserialize, Serialize};

use crate::errors::{config_error, io_error, Result};

/// Lock acquisition deadline when none is configured
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// What reads do with a store file that exists but cannot be read or parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Treat the file as an empty entry set; the next write replaces it
    #[default]
    ResetToEmpty,
    /// Report `CorruptDocument`; writes built on a read refuse to overwrite
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub lock_timeout_ms: u64,
    pub recovery: RecoveryPolicy,
    pub json: JsonOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            recovery: RecoveryPolicy::default(),
            json: JsonOptions::default(),
        }
    }
}

impl StoreConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_json(mut self, json: JsonOptions) -> Self {
        self.json = json;
        self
    }

    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Config` for malformed TOML, unknown keys, or an indent size
    /// of zero combined with a non-empty indent character.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(text).map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as `from_toml_str`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| io_error("read", path, err))?;
        Self::from_toml_str(&text).map_err(|err| err.with_path(path))
    }

    /// Render as TOML
    ///
    /// # Errors
    ///
    /// Returns `Config` if the configuration cannot be represented.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(config_error)
    }

    fn validate(&self) -> Result<()> {
        if !self.json.indent_char.is_whitespace() {
            return Err(config_error(format!(
                "indent_char must be whitespace, got {:?}",
                self.json.indent_char
            )));
        }
        if self.json.newline.chars().any(|c| c != '\n' && c != '\r') {
            return Err(config_error("newline may only contain '\\n' and '\\r'"));
        }
        Ok(())
    }
}
