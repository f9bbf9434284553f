//! Query specification and statement rendering.
//!
//! A [`QuerySpec`] is the clause accumulator behind a [`Model`](crate::Model).
//! It is a plain value: clause methods consume and return it, and each
//! `*_statement` method consumes it to render exactly one [`Statement`].
//!
//! Statement shapes (each `{PLACEHOLDER}` is substituted exactly once; absent
//! clauses render as empty strings):
//!
//! ```text
//! SELECT{DISTINCT} {FIELDS} FROM {TABLE}{JOIN}{WHERE}{GROUP}{HAVING}{ORDER}{LIMIT}
//! INSERT INTO {TABLE} SET {VALUES}
//! UPDATE {TABLE} SET {VALUES}{WHERE}{ORDER}{LIMIT}
//! DELETE FROM {TABLE}{WHERE}{ORDER}{LIMIT}
//! ```

use std::fmt;

use crate::codec::{self, EncodedRecord};
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::value::Value;

const SELECT_TEMPLATE: &str =
    "SELECT{DISTINCT} {FIELDS} FROM {TABLE}{JOIN}{WHERE}{GROUP}{HAVING}{ORDER}{LIMIT}";
const INSERT_TEMPLATE: &str = "INSERT INTO {TABLE} SET {VALUES}";
const UPDATE_TEMPLATE: &str = "UPDATE {TABLE} SET {VALUES}{WHERE}{ORDER}{LIMIT}";
const DELETE_TEMPLATE: &str = "DELETE FROM {TABLE}{WHERE}{ORDER}{LIMIT}";

/// Substitute `{NAME}` placeholders in a single pass.
///
/// Substituted text is never rescanned, so a value that happens to contain
/// `{WHERE}` is emitted verbatim. Unknown placeholders are kept as-is.
fn render_template<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find('}') {
            Some(end) => {
                let name = &tail[1..end];
                match lookup(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&tail[..=end]),
                }
                rest = &tail[end + 1..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Join flavor for [`QuerySpec::join`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
        }
    }
}

/// Row cap, optionally with an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    OffsetCount { offset: u64, count: u64 },
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Count(count) => write!(f, " LIMIT {count}"),
            Limit::OffsetCount { offset, count } => write!(f, " LIMIT {offset},{count}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    /// Caller-supplied SQL passed to `Model::query` / `Model::execute`.
    Raw,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
            StatementKind::Raw => "raw",
        }
    }
}

/// Rendered SQL with its positional `?` parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn raw(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            kind: StatementKind::Raw,
            sql: sql.into(),
            params,
        }
    }
}

/// Accumulated clause state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySpec {
    distinct: bool,
    fields: Option<String>,
    table: Option<String>,
    joins: Vec<String>,
    predicate: Option<String>,
    params: Vec<Value>,
    group_by: Vec<String>,
    having: Option<String>,
    order_by: Vec<String>,
    limit: Option<Limit>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projection list; replaces the previous one. Defaults to `*`.
    pub fn select(mut self, fields: &str) -> Self {
        self.fields = Some(fields.to_string());
        self
    }

    /// Source table.
    pub fn from(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Append a join.
    pub fn join(mut self, kind: JoinKind, table: &str, on: &str) -> Self {
        self.joins.push(format!("{} {} ON {}", kind.as_sql(), table, on));
        self
    }

    /// Filter predicate with `?` placeholders. Replaces the previous
    /// predicate and its parameters.
    pub fn filter(mut self, predicate: &str, params: Vec<Value>) -> Self {
        self.predicate = Some(predicate.to_string());
        self.params = params;
        self
    }

    /// Append GROUP BY items.
    pub fn group_by(mut self, columns: &str) -> Self {
        self.group_by.push(columns.to_string());
        self
    }

    /// HAVING predicate; replaces the previous one.
    pub fn having(mut self, predicate: &str) -> Self {
        self.having = Some(predicate.to_string());
        self
    }

    /// Append ORDER BY items.
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by.push(order.to_string());
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(Limit::Count(count));
        self
    }

    pub fn limit_offset(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some(Limit::OffsetCount { offset, count });
        self
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Set the table to `R`'s default when none was given.
    pub fn default_table<R: Record>(mut self) -> Self {
        if self.table.is_none() {
            self.table = Some(codec::table_name::<R>());
        }
        self
    }

    /// Render a SELECT. A missing table renders as an empty string.
    pub fn select_statement(self) -> Statement {
        let fragments = Fragments::new(&self);
        let sql = render_template(SELECT_TEMPLATE, |name| fragments.get(name));
        Statement {
            kind: StatementKind::Select,
            sql,
            params: self.params,
        }
    }

    /// Render an INSERT of every encoded column of `record`.
    pub fn insert_statement<R: Record>(self, record: &R) -> OrmResult<Statement> {
        let encoded = codec::encode(record)?;
        let spec = self.default_table::<R>();
        let (assignments, values) = assignments(encoded);
        let table = spec.table.unwrap_or_default();
        let sql = render_template(INSERT_TEMPLATE, |name| match name {
            "TABLE" => Some(table.as_str()),
            "VALUES" => Some(assignments.as_str()),
            _ => None,
        });
        Ok(Statement {
            kind: StatementKind::Insert,
            sql,
            params: values,
        })
    }

    /// Render an UPDATE of `record` by identity.
    ///
    /// The primary-key column becomes the filter (`pk = ?`, replacing any
    /// previous predicate) and is left out of SET. SET values come before the
    /// filter parameters.
    pub fn update_statement<R: Record>(self, record: &R) -> OrmResult<Statement> {
        let mut encoded = codec::encode(record)?;
        let pk = codec::scan_primary_key::<R>()?;
        let mut spec = self.default_table::<R>();
        if let Some(pk_value) = encoded.remove(&pk) {
            spec = spec.filter(&format!("{pk} = ?"), vec![pk_value]);
        }

        let (assignments, mut params) = assignments(encoded);
        let fragments = Fragments::new(&spec);
        let sql = render_template(UPDATE_TEMPLATE, |name| match name {
            "VALUES" => Some(assignments.as_str()),
            _ => fragments.get(name),
        });
        params.extend(spec.params);
        Ok(Statement {
            kind: StatementKind::Update,
            sql,
            params,
        })
    }

    /// Render a DELETE. Without a predicate the identity filter of `record`
    /// is used.
    pub fn delete_statement<R: Record>(self, record: &R) -> OrmResult<Statement> {
        let mut spec = self.default_table::<R>();
        if spec.predicate.is_none() {
            let encoded = codec::encode(record)?;
            let pk = codec::scan_primary_key::<R>()?;
            let pk_value = encoded
                .get(&pk)
                .cloned()
                .ok_or(OrmError::NoPrimaryKey(R::NAME))?;
            spec = spec.filter(&format!("{pk} = ?"), vec![pk_value]);
        }
        Ok(spec.delete_by_filter())
    }

    /// Render a DELETE using only the current predicate (if any).
    pub fn delete_by_filter(self) -> Statement {
        let fragments = Fragments::new(&self);
        let sql = render_template(DELETE_TEMPLATE, |name| fragments.get(name));
        Statement {
            kind: StatementKind::Delete,
            sql,
            params: self.params,
        }
    }
}

/// Clause fragments with their leading separators, ready for substitution.
struct Fragments {
    distinct: &'static str,
    fields: String,
    table: String,
    join: String,
    filter: String,
    group: String,
    having: String,
    order: String,
    limit: String,
}

impl Fragments {
    fn new(spec: &QuerySpec) -> Self {
        Self {
            distinct: if spec.distinct { " DISTINCT" } else { "" },
            fields: spec.fields.clone().unwrap_or_else(|| "*".to_string()),
            table: spec.table.clone().unwrap_or_default(),
            join: spec.joins.iter().map(|j| format!(" {j}")).collect(),
            filter: spec
                .predicate
                .as_ref()
                .map(|p| format!(" WHERE {p}"))
                .unwrap_or_default(),
            group: list_clause(" GROUP BY ", &spec.group_by),
            having: spec
                .having
                .as_ref()
                .map(|h| format!(" HAVING {h}"))
                .unwrap_or_default(),
            order: list_clause(" ORDER BY ", &spec.order_by),
            limit: spec.limit.map(|l| l.to_string()).unwrap_or_default(),
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        Some(match name {
            "DISTINCT" => self.distinct,
            "FIELDS" => self.fields.as_str(),
            "TABLE" => self.table.as_str(),
            "JOIN" => self.join.as_str(),
            "WHERE" => self.filter.as_str(),
            "GROUP" => self.group.as_str(),
            "HAVING" => self.having.as_str(),
            "ORDER" => self.order.as_str(),
            "LIMIT" => self.limit.as_str(),
            _ => return None,
        })
    }
}

fn list_clause(keyword: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    format!("{keyword}{}", items.join(", "))
}

/// `col = ?, ...` plus the values in the same order.
fn assignments(encoded: EncodedRecord) -> (String, Vec<Value>) {
    let mut sql = String::new();
    let mut values = Vec::with_capacity(encoded.len());
    for (i, (column, value)) in encoded.into_entries().into_iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&column);
        sql.push_str(" = ?");
        values.push(value);
    }
    (sql, values)
}
