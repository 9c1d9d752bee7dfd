//! Relational store access
//!
//! The reverse search only needs to run one parametrized SELECT and read the
//! rows back. [`SqliteStore`] provides that over a rusqlite connection.

use std::path::Path;
use std::sync::Mutex;

use log::debug;
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::Connection;

use crate::config::AclTables;
use crate::error::{AclError, Result};
use crate::query::{Query, Value};

/// One result row: column name to value, in projection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cols: Vec<(String, Value)>,
}

impl Row {
    pub fn new(cols: Vec<(String, Value)>) -> Self {
        Row { cols }
    }

    pub fn get(&self, col: &str) -> Option<&Value> {
        self.cols.iter().find(|(c, _)| c == col).map(|(_, v)| v)
    }

    /// Text column; NULL, missing and empty values read as `None`
    pub fn text(&self, col: &str) -> Result<Option<&str>> {
        match self.get(col) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Text(s)) if s.is_empty() => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s)),
            Some(other) => Err(AclError::MalformedRow(format!("column {} is not text: {:?}", col, other))),
        }
    }

    /// Text column that must be present
    pub fn require_text(&self, col: &str) -> Result<&str> {
        self.text(col)?.ok_or_else(|| AclError::MalformedRow(format!("missing column {}", col)))
    }
}

/// Builds rows from `(column, value)` pairs
impl<S: Into<String>> FromIterator<(S, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        Row { cols: iter.into_iter().map(|(c, v)| (c.into(), v)).collect() }
    }
}

/// Read access to the ACL tables
pub trait Store {
    /// Table names the store was configured with
    fn tables(&self) -> &AclTables;

    /// Execute one SELECT and return every row.
    ///
    /// Errors from the underlying database are returned unchanged.
    fn fetch(&self, query: &Query) -> Result<Vec<Row>>;
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(*i)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Bool(b) => ToSqlOutput::Owned(rusqlite::types::Value::Integer(i64::from(*b))),
        })
    }
}

fn from_sqlite(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Text(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
    }
}

/// SQLite-backed store
pub struct SqliteStore {
    conn: Mutex<Connection>,
    tables: AclTables,
}

impl SqliteStore {
    pub fn new(conn: Connection, tables: AclTables) -> Result<Self> {
        tables.validate()?;
        Ok(SqliteStore { conn: Mutex::new(conn), tables })
    }

    pub fn open(path: impl AsRef<Path>, tables: AclTables) -> Result<Self> {
        Self::new(Connection::open(path)?, tables)
    }

    pub fn open_in_memory(tables: AclTables) -> Result<Self> {
        Self::new(Connection::open_in_memory()?, tables)
    }

    /// Run `f` against the underlying connection (schema setup, ACL writes)
    pub fn with_connection<T, F: FnOnce(&Connection) -> Result<T>>(&self, f: F) -> Result<T> {
        let conn = self.conn.lock().unwrap_or_else(|p| p.into_inner());
        f(&conn)
    }
}

impl Store for SqliteStore {
    fn tables(&self) -> &AclTables {
        &self.tables
    }

    fn fetch(&self, query: &Query) -> Result<Vec<Row>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&query.sql)?;
            let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

            let named: Vec<(String, &dyn ToSql)> = query
                .params
                .iter()
                .map(|(n, v)| (format!(":{}", n), v as &dyn ToSql))
                .collect();
            let bind: Vec<(&str, &dyn ToSql)> = named.iter().map(|(n, v)| (n.as_str(), *v)).collect();

            let mut rows = stmt.query(bind.as_slice())?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let mut cols = Vec::with_capacity(names.len());
                for (i, name) in names.iter().enumerate() {
                    cols.push((name.clone(), from_sqlite(row.get_ref(i)?)));
                }
                out.push(Row::new(cols));
            }
            debug!("fetched {} rows", out.len());
            Ok(out)
        })
    }
}
