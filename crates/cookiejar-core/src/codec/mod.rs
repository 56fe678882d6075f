//! JSON codec for store files
//!
//! - `serialize` writes an entry set with the configured layout and escaping
//! - `deserialize` reads a document, tolerating comments and trailing commas
//! - `encode_value` / `decode_value` move single values across the typed
//!   boundary

mod finite;
mod format;
mod options;
mod tolerant;

pub use format::JarFormatter;
pub use options::{Escaping, JsonOptions};
pub use tolerant::{strip_comments, strip_trailing_commas};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{CookieJarError, ExError, ExErrorKind, Result};
use crate::model::Entries;

/// Deepest nesting a store document may have, counting the top-level object
///
/// Kept well under `serde_json`'s read recursion limit so everything written
/// can be read back.
pub const MAX_DEPTH: usize = 64;

/// Serialize an entry set to store-file text
///
/// Fails with `Serialization` when the document nests deeper than
/// [`MAX_DEPTH`].
pub fn serialize(entries: &Entries, options: &JsonOptions) -> Result<String> {
    if entries.values().any(|value| exceeds_depth(value, MAX_DEPTH - 1)) {
        return Err(ExError::new(ExErrorKind::Serialization)
            .with_op("serialize")
            .with_message(format!(
                "Document nests deeper than {} levels",
                MAX_DEPTH
            )));
    }

    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, JarFormatter::new(options));
    entries.serialize(&mut serializer)?;

    String::from_utf8(out).map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op("serialize")
            .with_message(format!("Serializer produced invalid UTF-8: {}", e))
    })
}

/// Parse store-file text into an entry set
///
/// A `null` document reads as an empty set. Anything that is not a JSON
/// object after comment and trailing-comma removal is `CorruptDocument`.
/// Callers decide whether an empty or whitespace-only file is meaningful;
/// here it is a parse error like any other.
pub fn deserialize(text: &str, options: &JsonOptions) -> Result<Entries> {
    let mut relaxed = std::borrow::Cow::Borrowed(text);
    if options.allow_comments {
        relaxed = strip_comments(&relaxed).into();
    }
    if options.allow_trailing_commas {
        relaxed = strip_trailing_commas(&relaxed).into();
    }

    let value: Value = serde_json::from_str(&relaxed).map_err(|e| {
        ExError::new(ExErrorKind::CorruptDocument)
            .with_op("deserialize")
            .with_message(e.to_string())
    })?;

    match value {
        Value::Object(entries) => Ok(entries),
        Value::Null => Ok(Entries::new()),
        other => Err(ExError::new(ExErrorKind::CorruptDocument)
            .with_op("deserialize")
            .with_message(format!("Expected a JSON object, found {}", kind_name(&other)))),
    }
}

/// Convert a caller value into a stored JSON value
///
/// NaN and infinite floats are rejected with `Serialization` instead of
/// silently becoming `null`.
pub fn encode_value<T: Serialize>(value: T) -> Result<Value> {
    finite::ensure_finite(&value).map_err(CookieJarError::from)?;
    serde_json::to_value(value).map_err(|e| CookieJarError::from(e).into())
}

/// Decode a stored value into the caller's type
///
/// Fails with `Decode` when the stored shape does not fit `T`.
pub fn decode_value<T: DeserializeOwned>(key: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        CookieJarError::Decode {
            key: key.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Whether `value` has more than `budget` levels of arrays and objects
fn exceeds_depth(value: &Value, budget: usize) -> bool {
    let Some(rest) = budget.checked_sub(1) else {
        return matches!(value, Value::Array(_) | Value::Object(_));
    };
    match value {
        Value::Array(items) => items.iter().any(|child| exceeds_depth(child, rest)),
        Value::Object(map) => map.values().any(|child| exceeds_depth(child, rest)),
        _ => false,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
