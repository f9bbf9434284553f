//! Record codec: tag-derived column naming, primary keys, encode and decode.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{OrmError, OrmResult};
use crate::record::{FieldDef, Record};
use crate::row::RawRow;
use crate::tag::{self, FieldTag};
use crate::value::{FieldKind, Value};

/// Column facts derived from a field's tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Position in [`Record::FIELDS`]
    pub index: usize,
    pub ident: &'static str,
    pub column: String,
    pub kind: FieldKind,
    pub primary_key: bool,
    pub ignored: bool,
}

impl FieldDescriptor {
    fn from_def(index: usize, def: &FieldDef) -> Self {
        let tag = FieldTag::parse(def.tag);
        Self {
            index,
            ident: def.ident,
            column: column_for(def, &tag),
            kind: def.kind,
            primary_key: tag.has(tag::PK),
            ignored: tag.has(tag::IGNORE),
        }
    }
}

fn column_for(def: &FieldDef, tag: &FieldTag) -> String {
    if tag.has(tag::FIELD) {
        tag.get(tag::FIELD).to_string()
    } else {
        def.ident.to_lowercase()
    }
}

/// Column name for a field: the `field:` override, else the lower-cased
/// identifier. Fails with [`OrmError::FieldIgnored`] for `ignore` fields.
pub fn field_name(def: &FieldDef) -> OrmResult<String> {
    let tag = FieldTag::parse(def.tag);
    if tag.has(tag::IGNORE) {
        return Err(OrmError::FieldIgnored(def.ident.to_string()));
    }
    Ok(column_for(def, &tag))
}

/// Default table name: the lower-cased record type name.
pub fn table_name<R: Record>() -> String {
    R::NAME.to_lowercase()
}

/// Descriptors for every field of `R`, derived once per type.
pub fn descriptors<R: Record>() -> &'static [FieldDescriptor] {
    static CACHE: OnceLock<RwLock<HashMap<TypeId, &'static [FieldDescriptor]>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    let key = TypeId::of::<R>();

    if let Some(cached) = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .copied()
    {
        return cached;
    }

    let computed: Vec<FieldDescriptor> = R::FIELDS
        .iter()
        .enumerate()
        .map(|(i, def)| FieldDescriptor::from_def(i, def))
        .collect();
    let computed: &'static [FieldDescriptor] = Box::leak(computed.into_boxed_slice());

    // Another thread may have won the race; keep whichever landed first.
    let mut map = cache.write().unwrap_or_else(PoisonError::into_inner);
    *map.entry(key).or_insert(computed)
}

/// Descriptors of `R`, or [`OrmError::NotAStruct`] when it has no fields.
pub(crate) fn checked_descriptors<R: Record>() -> OrmResult<&'static [FieldDescriptor]> {
    if R::FIELDS.is_empty() {
        return Err(OrmError::NotAStruct(R::NAME));
    }
    Ok(descriptors::<R>())
}

/// Column name of the first non-ignored field tagged `pk`.
pub fn scan_primary_key<R: Record>() -> OrmResult<String> {
    descriptors::<R>()
        .iter()
        .find(|d| d.primary_key && !d.ignored)
        .map(|d| d.column.clone())
        .ok_or(OrmError::NoPrimaryKey(R::NAME))
}

/// Column → value mapping for writes, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedRecord {
    entries: Vec<(String, Value)>,
}

impl EncodedRecord {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column`, replacing an existing entry in place.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(c, _)| c == column)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Number of encoded columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no column was encoded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Stringify every value the way a text driver would, producing a row.
    pub fn to_raw_row(&self) -> RawRow {
        self.entries.iter().map(|(c, v)| (c.as_str(), v.to_raw())).collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }
}

impl Serialize for EncodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (column, value) in &self.entries {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Encode every non-ignored field of `record` under its column name.
pub fn encode<R: Record>(record: &R) -> OrmResult<EncodedRecord> {
    let mut out = EncodedRecord::new();
    for desc in checked_descriptors::<R>()?.iter().filter(|d| !d.ignored) {
        if let Some(value) = record.value_at(desc.index) {
            out.insert(desc.column.clone(), value);
        }
    }
    Ok(out)
}

/// Merge `row` into `record`.
///
/// Only non-ignored fields whose column is present are written; everything
/// else keeps its current value.
pub fn decode<R: Record>(row: &RawRow, record: &mut R) -> OrmResult<()> {
    for desc in checked_descriptors::<R>()?.iter().filter(|d| !d.ignored) {
        let Some(raw) = row.get(&desc.column) else {
            continue;
        };
        let value = convert(desc, raw)?;
        if !record.set_value_at(desc.index, value) {
            return Err(OrmError::invalid_type(
                &desc.column,
                format!("value out of range for {}", desc.kind.name()),
            ));
        }
    }
    Ok(())
}

fn convert(desc: &FieldDescriptor, raw: &[u8]) -> OrmResult<Value> {
    let text = String::from_utf8_lossy(raw);
    let invalid = |e: String| OrmError::invalid_type(&desc.column, e);

    match desc.kind {
        FieldKind::Text => Ok(Value::Text(text.into_owned())),
        FieldKind::Bool => Ok(Value::Bool(text == "1")),
        FieldKind::Int8 | FieldKind::Int16 | FieldKind::Int32 | FieldKind::Int64 => {
            text.parse::<i64>().map(Value::Int).map_err(|e| invalid(e.to_string()))
        }
        FieldKind::UInt8 | FieldKind::UInt16 | FieldKind::UInt32 | FieldKind::UInt64 => {
            text.parse::<u64>().map(Value::UInt).map_err(|e| invalid(e.to_string()))
        }
        FieldKind::Float32 | FieldKind::Float64 => {
            text.parse::<f64>().map(Value::Float).map_err(|e| invalid(e.to_string()))
        }
        FieldKind::Time => parse_time(&text)
            .map(Value::Time)
            .ok_or_else(|| OrmError::unsupported_type(&desc.column, desc.kind.name())),
        FieldKind::Unsupported(name) => Err(OrmError::unsupported_type(&desc.column, name)),
    }
}

/// Unix seconds, then `YYYY-MM-DD HH:MM:SS`, then
/// `YYYY-MM-DD HH:MM:SS.mmm ±ZZZZ`.
pub fn parse_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(secs) = text.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.3f %z")
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests;
