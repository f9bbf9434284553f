//! # tagorm
//!
//! A small fluent SQL builder and record mapper driven by field tags.
//!
//! ## Features
//!
//! - **Fluent chains**: accumulate clauses on a [`Model`] and finish with one terminal call
//! - **Tag-driven mapping**: `#[db("pk; field:user_name; ignore")]` controls column names,
//!   identity and skipped fields
//! - **Placeholders only**: values travel as positional `?` parameters, never inside SQL text
//! - **Driver-agnostic**: any prepare/execute driver plugs in through [`Executor`]
//! - **Always reset**: a handle is back to its initial state after every terminal call
//!
//! ## Records
//!
//! ```ignore
//! use tagorm::Record;
//!
//! #[derive(Debug, Default, Record)]
//! struct User {
//!     #[db("pk")]
//!     id: i64,
//!     #[db("field:user_name")]
//!     name: String,
//!     active: bool,
//!     #[db("ignore")]
//!     cache: String,
//! }
//! ```
//!
//! The table defaults to the lower-cased type name (`user`); column names
//! default to the lower-cased field name.
//!
//! ## Model
//!
//! ```ignore
//! use tagorm::{Model, params};
//!
//! let mut m = Model::new(&db);
//!
//! // SELECT * FROM user WHERE active = ? ORDER BY id DESC LIMIT 10
//! let users: Vec<User> = m
//!     .filter("active = ?", params![true])
//!     .order_by("id DESC")
//!     .limit(10)
//!     .fetch_all()?;
//!
//! // INSERT INTO user SET id = ?, user_name = ?, active = ?
//! let id = m.insert(&user)?;
//!
//! // UPDATE user SET user_name = ?, active = ? WHERE id = ?
//! m.update(&user)?;
//!
//! // DELETE FROM user WHERE id = ?
//! m.delete(&user)?;
//! ```
//!
//! ## Logging
//!
//! Every statement is reported as a `tracing` event under the `tagorm.sql`
//! target. Level and truncation are set through [`ModelConfig`].

extern crate self as tagorm;

pub mod builder;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
mod log;
pub mod model;
pub mod prelude;
pub mod record;
pub mod row;
pub mod tag;
pub mod value;

#[cfg(test)]
mod fixtures;

pub use builder::{JoinKind, Limit, QuerySpec, Statement, StatementKind};
pub use codec::{EncodedRecord, FieldDescriptor, decode, encode, scan_primary_key, table_name};
pub use config::{ModelConfig, RowErrorPolicy};
pub use error::{DriverError, OrmError, OrmResult};
pub use executor::{ExecOutcome, Executor, Prepared, RecordingExecutor, RowSet};
pub use model::Model;
pub use record::{FieldDef, Record};
pub use row::RawRow;
pub use tag::FieldTag;
pub use value::{Column, FieldKind, Value};

#[cfg(feature = "derive")]
pub use tagorm_derive::Record;

/// Build a `Vec<Value>` of positional parameters.
///
/// ```ignore
/// m.filter("age > ? AND name = ?", params![18, "alice"]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}
