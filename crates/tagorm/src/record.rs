//! Record trait: the compile-time field table that the codec walks.

use crate::value::{Column, FieldKind, Value};

/// Static description of one record field, emitted by `#[derive(Record)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Rust field identifier
    pub ident: &'static str,
    /// Raw `#[db("...")]` tag, empty when the field has none
    pub tag: &'static str,
    /// Declared field type
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn new(ident: &'static str, tag: &'static str, kind: FieldKind) -> Self {
        Self { ident, tag, kind }
    }
}

/// A structured record that can be encoded to columns and decoded from rows.
///
/// This trait should typically be derived using `#[derive(Record)]`:
///
/// ```ignore
/// use tagorm::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct User {
///     #[db("pk")]
///     id: i64,
///     #[db("field:user_name")]
///     name: String,
///     #[db("ignore")]
///     cache: String,
/// }
/// ```
pub trait Record: Default + 'static {
    /// Rust type name; the default table is its lower-cased form.
    const NAME: &'static str;

    /// Fields in declaration order.
    const FIELDS: &'static [FieldDef];

    /// Current value of the field at `index` in [`Record::FIELDS`].
    fn value_at(&self, index: usize) -> Option<Value>;

    /// Store `value` into the field at `index`.
    ///
    /// Returns `false` when the index is out of range or the value does not
    /// fit the field's type.
    fn set_value_at(&mut self, index: usize, value: Value) -> bool;
}

/// Assign a decoded value to a field slot. Used by derived `set_value_at`.
#[doc(hidden)]
pub fn assign<T: Column>(slot: &mut T, value: Value) -> bool {
    match T::from_value(value) {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}
