//! Database dialect implementations.
//!
//! Each dialect knows one engine's type system, identifier syntax and
//! catalog layout. [`AnyDialect`] picks one at runtime from configuration.

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{DialectError, Result};
use crate::scope::Scope;
use crate::value::{ColumnType, ValueDescriptor};

/// Strings at least this long (or with no declared size) get the dialect's
/// unbounded text or blob type instead of a sized one.
pub const MAX_VARCHAR_SIZE: usize = 65532;

/// Trait for database-specific SQL translation.
#[allow(async_fn_in_trait)]
pub trait Dialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the column type for a field value.
    ///
    /// `size` is the declared size of the field, `0` when none was given.
    fn column_type(&self, value: &ValueDescriptor, size: usize) -> Result<ColumnType>;

    /// Returns the column type, constraints included, for a primary key
    /// field.
    fn primary_key_type(&self, value: &ValueDescriptor, size: usize) -> Result<ColumnType>;

    /// Returns whether the driver reports generated ids without a
    /// `RETURNING` clause.
    fn supports_last_insert_id(&self) -> bool;

    /// Returns the clause appended to an INSERT to get the generated key
    /// back, or an empty string when none is needed.
    fn returning_clause(&self, _table: &str, _key: &str) -> String {
        String::new()
    }

    /// Returns whether row limiting uses a leading `TOP n` instead of a
    /// trailing `LIMIT`.
    fn supports_top(&self) -> bool {
        false
    }

    /// Returns the placeholder for the bound parameter at `ordinal`
    /// (1-based).
    fn bind_placeholder(&self, _ordinal: usize) -> String {
        "?".to_string()
    }

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Quotes an identifier, doubling any embedded quote character.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Returns the `FROM` clause for a query without a table, or an empty
    /// string when the engine needs none.
    fn dummy_table_clause(&self) -> &'static str {
        ""
    }

    /// Extracts the schema name from a connection string.
    fn schema_name(&self, source: &str) -> Result<String>;

    /// Returns the schema name of the scope's connection.
    fn resolve_schema_name<S: Scope>(&self, scope: &S) -> Result<String> {
        self.schema_name(scope.source())
    }

    /// Returns whether the table exists in the connection's schema.
    async fn has_table<S: Scope>(&self, scope: &S, table: &str) -> Result<bool>;

    /// Returns whether the column exists on the table.
    async fn has_column<S: Scope>(&self, scope: &S, table: &str, column: &str) -> Result<bool>;

    /// Drops an index from the scope's table.
    async fn remove_index<S: Scope>(&self, scope: &mut S, index: &str) -> Result<()>;
}

/// Runs a count query in a child of `scope`.
///
/// `build` registers its bound values on the child and returns the SQL
/// text using the placeholders it got back.
pub(crate) async fn count_in_child<S, F>(scope: &S, build: F) -> Result<i64>
where
    S: Scope,
    F: FnOnce(&mut S::Child) -> String,
{
    let mut child = scope.child();
    let sql = build(&mut child);
    child.raw(sql);
    debug!(sql = %child.sql(), binds = child.vars().len(), "Running catalog query");
    child.fetch_count().await
}

/// Runs `sql` as a statement on `scope`.
pub(crate) async fn exec_on<S: Scope>(scope: &mut S, sql: String) -> Result<()> {
    debug!(sql = %sql, "Executing DDL");
    scope.raw(sql);
    scope.exec().await?;
    Ok(())
}

/// Supported database engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// MySQL and MariaDB.
    Mysql,
    /// PostgreSQL.
    Postgres,
    /// SQLite.
    Sqlite,
}

impl DialectKind {
    /// Returns the canonical name of the engine.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Picks the engine from the scheme of a connection URL.
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| DialectError::UnknownDialect(url.to_string()))?;
        scheme.parse()
    }

    /// Returns the dialect for this engine.
    #[must_use]
    pub const fn dialect(self) -> AnyDialect {
        match self {
            Self::Mysql => AnyDialect::Mysql(MysqlDialect::new()),
            Self::Postgres => AnyDialect::Postgres(PostgresDialect::new()),
            Self::Sqlite => AnyDialect::Sqlite(SqliteDialect::new()),
        }
    }
}

impl FromStr for DialectKind {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(DialectError::UnknownDialect(s.to_string())),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dialect chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyDialect {
    /// MySQL dialect.
    Mysql(MysqlDialect),
    /// PostgreSQL dialect.
    Postgres(PostgresDialect),
    /// SQLite dialect.
    Sqlite(SqliteDialect),
}

impl AnyDialect {
    /// Returns the engine of this dialect.
    #[must_use]
    pub const fn kind(&self) -> DialectKind {
        match self {
            Self::Mysql(_) => DialectKind::Mysql,
            Self::Postgres(_) => DialectKind::Postgres,
            Self::Sqlite(_) => DialectKind::Sqlite,
        }
    }

    /// Picks the dialect from the scheme of a connection URL.
    pub fn from_url(url: &str) -> Result<Self> {
        DialectKind::from_url(url).map(DialectKind::dialect)
    }
}

impl From<DialectKind> for AnyDialect {
    fn from(kind: DialectKind) -> Self {
        kind.dialect()
    }
}

macro_rules! dispatch {
    ($self:ident, $d:ident => $call:expr) => {
        match $self {
            AnyDialect::Mysql($d) => $call,
            AnyDialect::Postgres($d) => $call,
            AnyDialect::Sqlite($d) => $call,
        }
    };
}

impl Dialect for AnyDialect {
    fn name(&self) -> &'static str {
        dispatch!(self, d => d.name())
    }

    fn column_type(&self, value: &ValueDescriptor, size: usize) -> Result<ColumnType> {
        dispatch!(self, d => d.column_type(value, size))
    }

    fn primary_key_type(&self, value: &ValueDescriptor, size: usize) -> Result<ColumnType> {
        dispatch!(self, d => d.primary_key_type(value, size))
    }

    fn supports_last_insert_id(&self) -> bool {
        dispatch!(self, d => d.supports_last_insert_id())
    }

    fn returning_clause(&self, table: &str, key: &str) -> String {
        dispatch!(self, d => d.returning_clause(table, key))
    }

    fn supports_top(&self) -> bool {
        dispatch!(self, d => d.supports_top())
    }

    fn bind_placeholder(&self, ordinal: usize) -> String {
        dispatch!(self, d => d.bind_placeholder(ordinal))
    }

    fn identifier_quote(&self) -> char {
        dispatch!(self, d => d.identifier_quote())
    }

    fn quote_identifier(&self, name: &str) -> String {
        dispatch!(self, d => d.quote_identifier(name))
    }

    fn dummy_table_clause(&self) -> &'static str {
        dispatch!(self, d => d.dummy_table_clause())
    }

    fn schema_name(&self, source: &str) -> Result<String> {
        dispatch!(self, d => d.schema_name(source))
    }

    async fn has_table<S: Scope>(&self, scope: &S, table: &str) -> Result<bool> {
        dispatch!(self, d => d.has_table(scope, table).await)
    }

    async fn has_column<S: Scope>(&self, scope: &S, table: &str, column: &str) -> Result<bool> {
        dispatch!(self, d => d.has_column(scope, table, column).await)
    }

    async fn remove_index<S: Scope>(&self, scope: &mut S, index: &str) -> Result<()> {
        dispatch!(self, d => d.remove_index(scope, index).await)
    }
}
