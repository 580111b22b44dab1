#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use oxide_dialect::prelude::*;

/// An in-memory stand-in for a MySQL server's catalog.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashSet<(String, String)>,
    columns: HashSet<(String, String, String)>,
    indexes: HashSet<(String, String)>,
    offline: bool,
    /// Every statement run against the catalog, with its binds.
    pub log: Vec<(String, Vec<BindValue>)>,
}

impl Catalog {
    pub fn table(mut self, schema: &str, table: &str, columns: &[&str]) -> Self {
        self.tables.insert((schema.to_string(), table.to_string()));
        for column in columns {
            self.columns
                .insert((schema.to_string(), table.to_string(), column.to_string()));
        }
        self
    }

    pub fn index(mut self, table: &str, index: &str) -> Self {
        self.indexes.insert((table.to_string(), index.to_string()));
        self
    }

    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn has_index(&self, table: &str, index: &str) -> bool {
        self.indexes
            .contains(&(table.to_string(), index.to_string()))
    }
}

/// A MySQL [`Scope`] answering from a [`Catalog`].
#[derive(Debug, Clone)]
pub struct CatalogScope {
    catalog: Rc<RefCell<Catalog>>,
    source: String,
    table: Option<String>,
    sql: String,
    vars: Vec<BindValue>,
}

impl CatalogScope {
    pub fn new(catalog: Catalog, source: &str) -> Self {
        Self {
            catalog: Rc::new(RefCell::new(catalog)),
            source: source.to_string(),
            table: None,
            sql: String::new(),
            vars: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    pub fn catalog(&self) -> Rc<RefCell<Catalog>> {
        Rc::clone(&self.catalog)
    }

    fn text(&self, index: usize) -> String {
        self.vars[index]
            .as_text()
            .unwrap_or_else(|| panic!("bind {index} is not text: {:?}", self.vars))
            .to_string()
    }

    fn record(&self) -> Result<()> {
        let mut catalog = self.catalog.borrow_mut();
        catalog.log.push((self.sql.clone(), self.vars.clone()));
        if catalog.offline {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }
}

impl Scope for CatalogScope {
    type Child = Self;

    fn source(&self) -> &str {
        &self.source
    }

    fn child(&self) -> Self {
        Self {
            catalog: Rc::clone(&self.catalog),
            source: self.source.clone(),
            table: self.table.clone(),
            sql: String::new(),
            vars: Vec::new(),
        }
    }

    fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.sql = sql.into();
        self
    }

    fn add_to_vars(&mut self, value: impl Into<BindValue>) -> String {
        self.vars.push(value.into());
        MysqlDialect::new().bind_placeholder(self.vars.len())
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
            .map(|table| MysqlDialect::new().quote_identifier(table))
            .ok_or(DialectError::MissingTable)
    }

    async fn fetch_count(&self) -> Result<i64> {
        self.record()?;
        let catalog = self.catalog.borrow();

        let found = if self.sql.starts_with("SELECT count(*) FROM INFORMATION_SCHEMA.tables") {
            let (table, schema) = (self.text(0), self.text(1));
            catalog.tables.contains(&(schema, table))
        } else if self.sql.starts_with("SELECT count(*) FROM information_schema.columns") {
            let (schema, table, column) = (self.text(0), self.text(1), self.text(2));
            catalog.columns.contains(&(schema, table, column))
        } else {
            return Err(sqlx::Error::Protocol(format!("unexpected query: {}", self.sql)).into());
        };

        Ok(i64::from(found))
    }

    async fn exec(&self) -> Result<u64> {
        self.record()?;

        let rest = self
            .sql
            .strip_prefix("DROP INDEX ")
            .ok_or_else(|| sqlx::Error::Protocol(format!("unexpected statement: {}", self.sql)))?;
        let (index, table) = rest
            .split_once(" ON ")
            .ok_or_else(|| sqlx::Error::Protocol(format!("malformed statement: {}", self.sql)))?;
        let table = table.trim_matches('`');

        let removed = self
            .catalog
            .borrow_mut()
            .indexes
            .remove(&(table.to_string(), index.to_string()));
        if removed {
            Ok(0)
        } else {
            Err(sqlx::Error::Protocol(format!(
                "Can't DROP '{index}'; check that column/key exists"
            ))
            .into())
        }
    }
}
