//! Convenient imports for typical `tagorm` usage.
//!
//! ```ignore
//! use tagorm::prelude::*;
//! ```

pub use crate::{
    Column, ExecOutcome, Executor, JoinKind, Model, ModelConfig, OrmError, OrmResult, Prepared,
    RawRow, Record, RowErrorPolicy, RowSet, Value, params,
};
