//! The fluent model handle.
//!
//! ```ignore
//! use tagorm::{Model, params};
//!
//! let mut m = Model::new(&db);
//! let users: Vec<User> = m
//!     .filter("age > ?", params![18])
//!     .order_by("id DESC")
//!     .limit(10)
//!     .fetch_all()?;
//!
//! let id = m.insert(&new_user)?;
//! m.update(&user)?; // UPDATE user SET ... WHERE id = ?
//! ```
//!
//! Clause calls accumulate into a [`QuerySpec`]. Every terminal call
//! (`query*`, `find*`, `fetch*`, `insert`, `update`, `delete`, `execute`)
//! moves that spec out of the handle before doing anything else, so the
//! handle is back to its initial state afterwards whether the call
//! succeeded or not.

use crate::builder::{JoinKind, QuerySpec, Statement};
use crate::codec;
use crate::config::{ModelConfig, RowErrorPolicy};
use crate::error::{OrmError, OrmResult};
use crate::executor::{Executor, Prepared};
use crate::log;
use crate::record::Record;
use crate::row::RawRow;
use crate::value::Value;

/// Single-owner query handle bound to an executor.
///
/// Not meant to be shared between threads mid-chain: build and run a
/// statement, then reuse or drop the handle.
pub struct Model<'c, E: Executor> {
    executor: &'c E,
    config: ModelConfig,
    spec: QuerySpec,
    last_sql: String,
    last_insert_id: u64,
    affected_rows: u64,
}

impl<'c, E: Executor> Model<'c, E> {
    pub fn new(executor: &'c E) -> Self {
        Self::with_config(executor, ModelConfig::default())
    }

    pub fn with_config(executor: &'c E, config: ModelConfig) -> Self {
        Self {
            executor,
            config,
            spec: QuerySpec::new(),
            last_sql: String::new(),
            last_insert_id: 0,
            affected_rows: 0,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Clause state accumulated so far.
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    /// SELECT text for the current clause state, without running or resetting it.
    pub fn to_sql(&self) -> String {
        self.spec.clone().select_statement().sql
    }

    // ==================== Clauses ====================

    fn update_spec(&mut self, f: impl FnOnce(QuerySpec) -> QuerySpec) -> &mut Self {
        self.spec = f(std::mem::take(&mut self.spec));
        self
    }

    pub fn select(&mut self, fields: &str) -> &mut Self {
        self.update_spec(|s| s.select(fields))
    }

    pub fn from(&mut self, table: &str) -> &mut Self {
        self.update_spec(|s| s.from(table))
    }

    /// Alias of [`Model::from`].
    pub fn table(&mut self, table: &str) -> &mut Self {
        self.from(table)
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.update_spec(QuerySpec::distinct)
    }

    pub fn join(&mut self, kind: JoinKind, table: &str, on: &str) -> &mut Self {
        self.update_spec(|s| s.join(kind, table, on))
    }

    pub fn inner_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join(JoinKind::Inner, table, on)
    }

    pub fn left_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join(JoinKind::Left, table, on)
    }

    pub fn right_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join(JoinKind::Right, table, on)
    }

    /// WHERE predicate with `?` placeholders. Replaces the previous predicate
    /// and its parameters.
    #[doc(alias = "where")]
    pub fn filter(&mut self, predicate: &str, params: Vec<Value>) -> &mut Self {
        self.update_spec(|s| s.filter(predicate, params))
    }

    pub fn group_by(&mut self, columns: &str) -> &mut Self {
        self.update_spec(|s| s.group_by(columns))
    }

    pub fn having(&mut self, predicate: &str) -> &mut Self {
        self.update_spec(|s| s.having(predicate))
    }

    pub fn order_by(&mut self, order: &str) -> &mut Self {
        self.update_spec(|s| s.order_by(order))
    }

    pub fn limit(&mut self, count: u64) -> &mut Self {
        self.update_spec(|s| s.limit(count))
    }

    pub fn limit_offset(&mut self, offset: u64, count: u64) -> &mut Self {
        self.update_spec(|s| s.limit_offset(offset, count))
    }

    // ==================== Reads ====================

    /// Run caller-supplied read SQL.
    pub fn query(&mut self, sql: &str, params: Vec<Value>) -> OrmResult<Vec<RawRow>> {
        self.take_spec();
        self.run_query(Statement::raw(sql, params))
    }

    /// Run the accumulated SELECT and return every row.
    pub fn query_all(&mut self) -> OrmResult<Vec<RawRow>> {
        let spec = self.take_spec();
        self.run_query(spec.select_statement())
    }

    /// Run the accumulated SELECT with `LIMIT 1`.
    pub fn query_one(&mut self) -> OrmResult<Option<RawRow>> {
        let spec = self.take_spec().limit(1);
        Ok(self.run_query(spec.select_statement())?.into_iter().next())
    }

    /// First column of the first row.
    pub fn query_scalar(&mut self) -> OrmResult<Option<Vec<u8>>> {
        Ok(self.query_one()?.and_then(RawRow::into_first))
    }

    /// Decode the first matching row into a fresh `R`.
    ///
    /// `Ok(None)` when nothing matched; decode errors are returned as-is.
    /// A record type without fields fails with [`OrmError::NotAStruct`]
    /// before the executor is called.
    pub fn find_one<R: Record>(&mut self) -> OrmResult<Option<R>> {
        let spec = self.take_spec().default_table::<R>().limit(1);
        codec::checked_descriptors::<R>()?;
        let Some(row) = self.run_query(spec.select_statement())?.into_iter().next() else {
            return Ok(None);
        };
        let mut record = R::default();
        codec::decode(&row, &mut record)?;
        Ok(Some(record))
    }

    /// Like [`Model::find_one`] but a missing row is [`OrmError::NotFound`].
    pub fn fetch_one<R: Record>(&mut self) -> OrmResult<R> {
        self.find_one()?
            .ok_or_else(|| OrmError::not_found(format!("no {} row matched", R::NAME)))
    }

    /// Append every matching row to `out`, returning how many were added.
    ///
    /// Rows that fail to decode follow [`ModelConfig::row_error_policy`]:
    /// skipped with a warning, or the whole fetch fails and `out` is left
    /// untouched.
    pub fn find_all<R: Record>(&mut self, out: &mut Vec<R>) -> OrmResult<usize> {
        let spec = self.take_spec().default_table::<R>();
        codec::checked_descriptors::<R>()?;
        let rows = self.run_query(spec.select_statement())?;

        let mut decoded = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let mut record = R::default();
            match codec::decode(row, &mut record) {
                Ok(()) => decoded.push(record),
                Err(err) => match self.config.row_error_policy {
                    RowErrorPolicy::SkipAndLog => log::skipped_row(R::NAME, i, &err),
                    RowErrorPolicy::FailFast => return Err(err),
                },
            }
        }

        let added = decoded.len();
        out.extend(decoded);
        Ok(added)
    }

    /// Collect every matching row into a new vector.
    pub fn fetch_all<R: Record>(&mut self) -> OrmResult<Vec<R>> {
        let mut out = Vec::new();
        self.find_all(&mut out)?;
        Ok(out)
    }

    // ==================== Writes ====================

    /// Run caller-supplied mutating SQL.
    ///
    /// Returns the generated id when the driver reports a nonzero one,
    /// otherwise the affected-row count.
    pub fn execute(&mut self, sql: &str, params: Vec<Value>) -> OrmResult<u64> {
        self.take_spec();
        self.run_exec(Statement::raw(sql, params))
    }

    /// `INSERT INTO {table} SET col = ?, ...` for every encoded column.
    pub fn insert<R: Record>(&mut self, record: &R) -> OrmResult<u64> {
        let stmt = self.take_spec().insert_statement(record)?;
        self.run_exec(stmt)
    }

    /// Update `record` by primary key. See [`QuerySpec::update_statement`].
    pub fn update<R: Record>(&mut self, record: &R) -> OrmResult<u64> {
        let stmt = self.take_spec().update_statement(record)?;
        self.run_exec(stmt)
    }

    /// Delete by the current predicate, or by `record`'s primary key when
    /// no predicate was set.
    pub fn delete<R: Record>(&mut self, record: &R) -> OrmResult<u64> {
        let stmt = self.take_spec().delete_statement(record)?;
        self.run_exec(stmt)
    }

    // ==================== Last execution ====================

    /// SQL of the last statement sent to the executor.
    pub fn last_sql(&self) -> &str {
        &self.last_sql
    }

    /// Generated id reported by the last write (0 if none).
    pub fn last_insert_id(&self) -> u64 {
        self.last_insert_id
    }

    /// Rows affected by the last write (0 if unknown).
    pub fn affected_rows(&self) -> u64 {
        self.affected_rows
    }

    // ==================== Internals ====================

    /// Move the clause state out and clear the previous execution result.
    fn take_spec(&mut self) -> QuerySpec {
        self.last_sql.clear();
        self.last_insert_id = 0;
        self.affected_rows = 0;
        std::mem::take(&mut self.spec)
    }

    fn run_query(&mut self, stmt: Statement) -> OrmResult<Vec<RawRow>> {
        log::statement(&self.config, stmt.kind.as_str(), &stmt.sql, stmt.params.len());
        self.last_sql = stmt.sql;
        let mut prepared = self.executor.prepare(&self.last_sql)?;
        let rows = prepared.query(&stmt.params)?;
        Ok(rows.into_raw_rows())
    }

    fn run_exec(&mut self, stmt: Statement) -> OrmResult<u64> {
        log::statement(&self.config, stmt.kind.as_str(), &stmt.sql, stmt.params.len());
        self.last_sql = stmt.sql;
        let mut prepared = self.executor.prepare(&self.last_sql)?;
        let outcome = prepared.exec(&stmt.params)?;

        self.last_insert_id = outcome.last_insert_id.unwrap_or(0);
        self.affected_rows = outcome.rows_affected.unwrap_or(0);
        if self.last_insert_id > 0 {
            Ok(self.last_insert_id)
        } else {
            Ok(self.affected_rows)
        }
    }
}
