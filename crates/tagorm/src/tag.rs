//! Field tag parsing.
//!
//! A tag is the metadata string attached to a record field, e.g.
//! `#[db("pk; field:user_id")]`. Entries are separated by `;`, and each entry
//! is a key with an optional `:value`.

use std::collections::HashMap;

/// Exclude the field from encode and decode.
pub const IGNORE: &str = "ignore";
/// Explicit column name override (`field:<name>`).
pub const FIELD: &str = "field";
/// Mark the field as the primary key.
pub const PK: &str = "pk";

/// Parsed key/value view of a field tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    data: HashMap<String, String>,
}

impl FieldTag {
    /// Parse a raw tag string.
    ///
    /// Never fails: entries without `:` are stored with an empty value, and
    /// later duplicates overwrite earlier ones.
    pub fn parse(raw: &str) -> Self {
        let mut data = HashMap::new();
        for entry in raw.split(';') {
            let (key, value) = match entry.split_once(':') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (entry.trim(), ""),
            };
            data.insert(key.to_string(), value.to_string());
        }
        Self { data }
    }

    /// Whether the tag carries `key`, with or without a value.
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// The value stored under `key`, or `""` when absent.
    pub fn get(&self, key: &str) -> &str {
        self.data.get(key).map(String::as_str).unwrap_or("")
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no keys were parsed.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
