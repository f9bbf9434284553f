//! Dynamic column values and the field types that map onto them.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Layout used when a temporal value is rendered to driver text.
/// Fractional seconds are written only when nonzero (3, 6 or 9 digits).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A bound parameter or encoded column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Time(DateTime<Utc>),
}

impl Value {
    /// Render the value the way a text-protocol driver hands it back.
    ///
    /// Booleans become `"1"`/`"0"` and temporal values use [`DATETIME_FORMAT`].
    pub fn to_raw(&self) -> Vec<u8> {
        match self {
            Value::Text(s) => s.clone().into_bytes(),
            Value::Int(v) => v.to_string().into_bytes(),
            Value::UInt(v) => v.to_string().into_bytes(),
            Value::Float(v) => v.to_string().into_bytes(),
            Value::Bool(v) => vec![if *v { b'1' } else { b'0' }],
            Value::Time(t) => t.format(DATETIME_FORMAT).to_string().into_bytes(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Time(_) => "datetime",
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

/// The declared type of a record field, as seen by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Time,
    /// Write-only type: encodes to a [`Value`] but has no raw-bytes decoder.
    Unsupported(&'static str),
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "String",
            FieldKind::Bool => "bool",
            FieldKind::Int8 => "i8",
            FieldKind::Int16 => "i16",
            FieldKind::Int32 => "i32",
            FieldKind::Int64 => "i64",
            FieldKind::UInt8 => "u8",
            FieldKind::UInt16 => "u16",
            FieldKind::UInt32 => "u32",
            FieldKind::UInt64 => "u64",
            FieldKind::Float32 => "f32",
            FieldKind::Float64 => "f64",
            FieldKind::Time => "DateTime<Utc>",
            FieldKind::Unsupported(name) => *name,
        }
    }
}

/// A Rust type that can back a record field.
///
/// `to_value` feeds writes; `from_value` accepts the value the decoder
/// produced for [`Column::KIND`] and returns `None` when it does not fit
/// (e.g. an out-of-range integer).
pub trait Column: Sized {
    const KIND: FieldKind;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Option<Self>;
}

impl Column for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Column for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! signed_column {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(i64::from(v))
            }
        }

        impl Column for $ty {
            const KIND: FieldKind = FieldKind::$kind;

            fn to_value(&self) -> Value {
                Value::Int(i64::from(*self))
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::Int(v) => <$ty>::try_from(v).ok(),
                    Value::UInt(v) => <$ty>::try_from(v).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

macro_rules! unsigned_column {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::UInt(u64::from(v))
            }
        }

        impl Column for $ty {
            const KIND: FieldKind = FieldKind::$kind;

            fn to_value(&self) -> Value {
                Value::UInt(u64::from(*self))
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::UInt(v) => <$ty>::try_from(v).ok(),
                    Value::Int(v) => <$ty>::try_from(v).ok(),
                    _ => None,
                }
            }
        }
    )*};
}

signed_column!(i8 => Int8, i16 => Int16, i32 => Int32, i64 => Int64);
unsigned_column!(u8 => UInt8, u16 => UInt16, u32 => UInt32, u64 => UInt64);

impl Column for f32 {
    const KIND: FieldKind = FieldKind::Float32;

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl Column for f64 {
    const KIND: FieldKind = FieldKind::Float64;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl Column for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Time;

    fn to_value(&self) -> Value {
        Value::Time(*self)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }
}
