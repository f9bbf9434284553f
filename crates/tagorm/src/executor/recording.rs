//! In-memory executor that records statements and replays scripted results.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ExecOutcome, Executor, Prepared, RowSet};
use crate::error::{OrmError, OrmResult};
use crate::value::Value;

/// Error returned by [`RecordingExecutor`] for a scripted failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ScriptedError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Query,
    Exec,
}

/// One statement the executor ran.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug)]
enum Scripted {
    Rows(RowSet),
    Outcome(ExecOutcome),
    Fail(String),
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<RecordedCall>,
    prepared: Vec<String>,
    script: VecDeque<Scripted>,
    fail_prepare: Option<String>,
}

/// Executor for tests: every prepared statement and its parameters are
/// recorded, and results are popped from a FIFO script.
///
/// With an empty script, queries return no rows and statements report
/// nothing affected.
///
/// ```ignore
/// let db = RecordingExecutor::new();
/// db.push_rows(RowSet::new(["id"]).with_row(["1"]));
/// let mut m = Model::new(&db);
/// let rows = m.from("users").query_all()?;
/// assert_eq!(db.last_call().unwrap().sql, "SELECT * FROM users");
/// ```
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    state: Mutex<State>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a row set for the next query.
    pub fn push_rows(&self, rows: RowSet) -> &Self {
        self.lock().script.push_back(Scripted::Rows(rows));
        self
    }

    /// Queue an outcome for the next exec.
    pub fn push_outcome(&self, outcome: ExecOutcome) -> &Self {
        self.lock().script.push_back(Scripted::Outcome(outcome));
        self
    }

    /// Queue a driver failure for the next query or exec.
    pub fn push_error(&self, message: impl Into<String>) -> &Self {
        self.lock().script.push_back(Scripted::Fail(message.into()));
        self
    }

    /// Make the next `prepare` fail (e.g. a syntax error).
    pub fn fail_next_prepare(&self, message: impl Into<String>) -> &Self {
        self.lock().fail_prepare = Some(message.into());
        self
    }

    /// Statements that ran, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.lock().calls.last().cloned()
    }

    /// SQL text of every successful `prepare`, in order.
    pub fn prepared(&self) -> Vec<String> {
        self.lock().prepared.clone()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.calls.clear();
        state.prepared.clear();
        state.script.clear();
        state.fail_prepare = None;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run(&self, kind: CallKind, sql: &str, params: &[Value]) -> Option<Scripted> {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            kind,
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        state.script.pop_front()
    }
}

impl Executor for RecordingExecutor {
    type Prepared<'a>
        = RecordingStatement<'a>
    where
        Self: 'a;

    fn prepare<'a>(&'a self, sql: &str) -> OrmResult<RecordingStatement<'a>> {
        let mut state = self.lock();
        if let Some(message) = state.fail_prepare.take() {
            return Err(OrmError::executor(ScriptedError(message)));
        }
        state.prepared.push(sql.to_string());
        Ok(RecordingStatement {
            executor: self,
            sql: sql.to_string(),
        })
    }
}

/// Statement handle returned by [`RecordingExecutor::prepare`].
#[derive(Debug)]
pub struct RecordingStatement<'a> {
    executor: &'a RecordingExecutor,
    sql: String,
}

impl Prepared for RecordingStatement<'_> {
    fn query(&mut self, params: &[Value]) -> OrmResult<RowSet> {
        match self.executor.run(CallKind::Query, &self.sql, params) {
            None => Ok(RowSet::default()),
            Some(Scripted::Rows(rows)) => Ok(rows),
            Some(Scripted::Fail(message)) => Err(OrmError::executor(ScriptedError(message))),
            Some(Scripted::Outcome(_)) => Err(OrmError::Other(
                "scripted exec outcome consumed by a query".to_string(),
            )),
        }
    }

    fn exec(&mut self, params: &[Value]) -> OrmResult<ExecOutcome> {
        match self.executor.run(CallKind::Exec, &self.sql, params) {
            None => Ok(ExecOutcome::default()),
            Some(Scripted::Outcome(outcome)) => Ok(outcome),
            Some(Scripted::Fail(message)) => Err(OrmError::executor(ScriptedError(message))),
            Some(Scripted::Rows(_)) => Err(OrmError::Other(
                "scripted row set consumed by an exec".to_string(),
            )),
        }
    }
}
