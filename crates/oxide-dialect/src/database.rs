//! sqlx-backed database handle and scope.
//!
//! [`Database`] owns an `AnyPool` together with the dialect selected from
//! the connection URL, and hands out [`PoolScope`]s for dialect operations.

use std::sync::Arc;

use sqlx::any::{AnyArguments, AnyPoolOptions};
use sqlx::{Any, AnyPool, Arguments};
use tracing::info;

use crate::dialect::{AnyDialect, Dialect};
use crate::error::{DialectError, Result};
use crate::scope::{BindValue, Scope};

/// Connection pool options.
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self { max_connections: 5 }
    }
}

impl DatabaseOptions {
    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// A database connection pool paired with its dialect.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    dialect: AnyDialect,
    source: Arc<str>,
}

impl Database {
    /// Connects to `url` with default options.
    ///
    /// The dialect is picked from the URL scheme.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with(url, DatabaseOptions::default()).await
    }

    /// Connects to `url` with the given options.
    pub async fn connect_with(url: &str, options: DatabaseOptions) -> Result<Self> {
        sqlx::any::install_default_drivers();
        let dialect = AnyDialect::from_url(url)?;
        let pool = AnyPoolOptions::new()
            .max_connections(options.max_connections)
            .connect(url)
            .await?;

        info!(dialect = dialect.name(), "Connected to database");

        Ok(Self::from_pool(pool, dialect, url))
    }

    /// Wraps an existing pool.
    #[must_use]
    pub fn from_pool(pool: AnyPool, dialect: AnyDialect, source: &str) -> Self {
        Self {
            pool,
            dialect,
            source: Arc::from(source),
        }
    }

    /// Returns the connection pool.
    #[must_use]
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &AnyDialect {
        &self.dialect
    }

    /// Returns the connection string.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Creates a scope with no table.
    #[must_use]
    pub fn scope(&self) -> PoolScope {
        PoolScope::new(self.clone(), None)
    }

    /// Creates a scope bound to `table`.
    #[must_use]
    pub fn table(&self, table: impl Into<String>) -> PoolScope {
        PoolScope::new(self.clone(), Some(table.into()))
    }

    /// Returns whether `table` exists.
    pub async fn has_table(&self, table: &str) -> Result<bool> {
        self.dialect.has_table(&self.scope(), table).await
    }

    /// Returns whether `column` exists on `table`.
    pub async fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.dialect.has_column(&self.scope(), table, column).await
    }

    /// Drops `index` from `table`.
    pub async fn remove_index(&self, table: &str, index: &str) -> Result<()> {
        let mut scope = self.table(table);
        self.dialect.remove_index(&mut scope, index).await
    }
}

/// A [`Scope`] running its SQL on a [`Database`] pool.
#[derive(Debug, Clone)]
pub struct PoolScope {
    db: Database,
    table: Option<String>,
    sql: String,
    vars: Vec<BindValue>,
}

impl PoolScope {
    fn new(db: Database, table: Option<String>) -> Self {
        Self {
            db,
            table,
            sql: String::new(),
            vars: Vec::new(),
        }
    }

    /// Returns the unquoted table name, if the scope has one.
    #[must_use]
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    fn arguments(&self) -> Result<AnyArguments<'_>> {
        let mut args = AnyArguments::default();
        for value in &self.vars {
            let added = match value.clone() {
                BindValue::Null => args.add(Option::<i64>::None),
                BindValue::Bool(b) => args.add(b),
                BindValue::Int(i) => args.add(i),
                BindValue::Float(f) => args.add(f),
                BindValue::Text(s) => args.add(s),
                BindValue::Blob(b) => args.add(b),
            };
            added.map_err(sqlx::Error::Encode)?;
        }
        Ok(args)
    }
}

impl Scope for PoolScope {
    type Child = Self;

    fn source(&self) -> &str {
        self.db.source()
    }

    fn child(&self) -> Self {
        Self::new(self.db.clone(), self.table.clone())
    }

    fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.sql = sql.into();
        self
    }

    fn add_to_vars(&mut self, value: impl Into<BindValue>) -> String {
        self.vars.push(value.into());
        self.db.dialect.bind_placeholder(self.vars.len())
    }

    fn sql(&self) -> &str {
        &self.sql
    }

    fn vars(&self) -> &[BindValue] {
        &self.vars
    }

    fn quoted_table_name(&self) -> Result<String> {
        self.table
            .as_deref()
            .map(|table| self.db.dialect.quote_identifier(table))
            .ok_or(DialectError::MissingTable)
    }

    async fn fetch_count(&self) -> Result<i64> {
        let args = self.arguments()?;
        let count = sqlx::query_scalar_with::<Any, i64, _>(&self.sql, args)
            .fetch_one(&self.db.pool)
            .await?;
        Ok(count)
    }

    async fn exec(&self) -> Result<u64> {
        let args = self.arguments()?;
        let result = sqlx::query_with::<Any, _>(&self.sql, args)
            .execute(&self.db.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
