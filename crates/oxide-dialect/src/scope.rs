//! The query scope a dialect works through.
//!
//! A [`Scope`] is the ORM's execution context: it carries the connection,
//! the connection string, the SQL text being built and its bound values.
//! Dialects never open connections themselves; every introspection query
//! and DDL statement goes through a scope handed in by the caller.

use crate::error::Result;

/// A value bound to a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl BindValue {
    /// Returns the text value, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for BindValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for BindValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for BindValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Execution context consumed by dialects.
///
/// Implemented by the ORM; [`crate::database::PoolScope`] is the sqlx-backed
/// implementation shipped with this crate.
#[allow(async_fn_in_trait)]
pub trait Scope {
    /// Scope type produced by [`Scope::child`].
    type Child: Scope;

    /// Returns the connection string the scope's database was opened with.
    fn source(&self) -> &str;

    /// Creates a fresh scope on the same connection with no SQL and no
    /// bound values.
    fn child(&self) -> Self::Child;

    /// Sets the SQL text of this scope.
    fn raw(&mut self, sql: impl Into<String>) -> &mut Self;

    /// Binds a value and returns the placeholder to embed in the SQL.
    fn add_to_vars(&mut self, value: impl Into<BindValue>) -> String;

    /// Returns the SQL text.
    fn sql(&self) -> &str;

    /// Returns the bound values in placeholder order.
    fn vars(&self) -> &[BindValue];

    /// Returns the scope's table name, quoted for its dialect.
    fn quoted_table_name(&self) -> Result<String>;

    /// Runs the SQL and reads the first column of the single result row.
    async fn fetch_count(&self) -> Result<i64>;

    /// Runs the SQL as a statement and returns the number of affected rows.
    async fn exec(&self) -> Result<u64>;
}
