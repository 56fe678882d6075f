//! Codec options

use serde::{Deserialize, Serialize};

/// How string content is escaped on write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Escaping {
    /// Escape only `"`, `\` and control characters; everything else verbatim
    #[default]
    Relaxed,
    /// Additionally escape HTML-sensitive characters and all non-ASCII
    Strict,
}

/// Options used when reading and writing a store file
///
/// The default writes one tab per level with `\n` newlines, relaxed
/// escaping, and reads trailing commas and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsonOptions {
    pub indent_char: char,
    pub indent_size: usize,
    pub newline: String,
    pub allow_trailing_commas: bool,
    pub allow_comments: bool,
    pub escaping: Escaping,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            indent_char: '\t',
            indent_size: 1,
            newline: "\n".to_string(),
            allow_trailing_commas: true,
            allow_comments: true,
            escaping: Escaping::Relaxed,
        }
    }
}

impl JsonOptions {
    /// The indentation written for one nesting level
    pub fn indent_unit(&self) -> String {
        std::iter::repeat(self.indent_char)
            .take(self.indent_size)
            .collect()
    }

    /// Options that reject comments and trailing commas on read
    pub fn strict_reader(mut self) -> Self {
        self.allow_comments = false;
        self.allow_trailing_commas = false;
        self
    }
}
