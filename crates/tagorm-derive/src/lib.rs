//! Derive macros for tagorm
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record;

/// Derive the `Record` field table for a struct.
///
/// # Example
///
/// ```ignore
/// use tagorm::Record;
///
/// #[derive(Default, Record)]
/// struct User {
///     #[db("pk")]
///     id: i64,
///     #[db("field:user_name")]
///     name: String,
///     #[db("ignore")]
///     cache: Vec<u8>,
/// }
/// ```
///
/// # Tags
///
/// `#[db("...")]` holds `;`-separated items, each `key` or `key:value`:
///
/// - `pk` - Primary key used by update and delete
/// - `field:name` - Map field to a different column name
/// - `ignore` - Never encoded or decoded; the field type needs no `Column` impl
///
/// Every other field type must implement `tagorm::Column`.
#[proc_macro_derive(Record, attributes(db))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
