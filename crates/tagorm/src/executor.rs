//! Executor boundary.
//!
//! The model never talks to a database directly. It prepares a statement with
//! `?` placeholders through an [`Executor`] and runs it with positional
//! parameters; values are never interpolated into the SQL text. Connection
//! management, pooling and driver thread-safety are the executor's concern.

use crate::error::OrmResult;
use crate::row::RawRow;
use crate::value::Value;

mod recording;

pub use recording::{CallKind, RecordedCall, RecordingExecutor, ScriptedError};

/// A prepare/execute-style SQL driver handle.
pub trait Executor {
    type Prepared<'a>: Prepared
    where
        Self: 'a;

    /// Prepare `sql` for execution.
    fn prepare<'a>(&'a self, sql: &str) -> OrmResult<Self::Prepared<'a>>;
}

/// A statement prepared by an [`Executor`].
pub trait Prepared {
    /// Run a read statement and buffer every row.
    fn query(&mut self, params: &[Value]) -> OrmResult<RowSet>;

    /// Run a mutating statement.
    fn exec(&mut self, params: &[Value]) -> OrmResult<ExecOutcome>;
}

/// Outcome of a mutating statement. `None` means the driver could not report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    pub last_insert_id: Option<u64>,
    pub rows_affected: Option<u64>,
}

impl ExecOutcome {
    pub fn new(last_insert_id: u64, rows_affected: u64) -> Self {
        Self {
            last_insert_id: Some(last_insert_id),
            rows_affected: Some(rows_affected),
        }
    }

    pub fn affected(rows_affected: u64) -> Self {
        Self {
            last_insert_id: None,
            rows_affected: Some(rows_affected),
        }
    }
}

/// Buffered result of a read statement: column names plus raw cells.
/// A `None` cell is SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<Vec<u8>>>>,
}

impl RowSet {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row of non-NULL cells.
    pub fn with_row<I, B>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        self.rows
            .push(cells.into_iter().map(|c| Some(c.as_ref().to_vec())).collect());
        self
    }

    /// Append a row that may contain NULL cells.
    pub fn with_cells(mut self, cells: Vec<Option<Vec<u8>>>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pair every cell with its column name. NULL becomes an empty value.
    pub fn into_raw_rows(self) -> Vec<RawRow> {
        let columns = self.columns;
        self.rows
            .into_iter()
            .map(|cells| {
                columns
                    .iter()
                    .zip(cells)
                    .map(|(c, cell)| (c.as_str(), cell.unwrap_or_default()))
                    .collect()
            })
            .collect()
    }
}
