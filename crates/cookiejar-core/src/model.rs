//! Entry set model
//!
//! The store keeps one flat JSON object per file. Values are plain
//! `serde_json::Value`s and only take a concrete type at the call site.

use serde_json::{Map, Value};

/// The full key-value mapping held in one store file
///
/// Insertion order is preserved when the set is rewritten.
pub type Entries = Map<String, Value>;

/// Apply one `set` to an entry set
///
/// A non-null value inserts or overwrites `key`; `null` removes it.
/// Returns the previous value, if any.
pub fn apply_set(entries: &mut Entries, key: &str, value: Value) -> Option<Value> {
    if value.is_null() {
        entries.remove(key)
    } else {
        entries.insert(key.to_string(), value)
    }
}

/// Look up a key, treating a stored `null` the same as a missing key
pub fn lookup<'a>(entries: &'a Entries, key: &str) -> Option<&'a Value> {
    entries.get(key).filter(|value| !value.is_null())
}
