//! SQLite dialect.
//!
//! SQLite stores any value in any column, so the declared types here only
//! pick the column affinity. Tables are looked up in `sqlite_master` and
//! columns through the `pragma_table_info` table-valued function
//! (SQLite 3.16+).

use tracing::info;

use super::{count_in_child, exec_on, Dialect, MAX_VARCHAR_SIZE};
use crate::connection::SqliteDsn;
use crate::error::{DialectError, Result};
use crate::scope::Scope;
use crate::value::{ColumnType, ValueDescriptor, ValueKind};

/// SQLite dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqliteDialect;

impl SqliteDialect {
    const NAME: &'static str = "sqlite";

    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn column_type(&self, value: &ValueDescriptor, size: usize) -> Result<ColumnType> {
        let sql = match &value.kind {
            ValueKind::Bool => "bool".to_string(),
            ValueKind::Int
            | ValueKind::Int8
            | ValueKind::Int16
            | ValueKind::Int32
            | ValueKind::Uint
            | ValueKind::Uint8
            | ValueKind::Uint16
            | ValueKind::Uint32
            | ValueKind::Uintptr => "integer".to_string(),
            ValueKind::Int64 | ValueKind::Uint64 => "bigint".to_string(),
            ValueKind::Float32 | ValueKind::Float64 => "real".to_string(),
            ValueKind::String => {
                if size > 0 && size < MAX_VARCHAR_SIZE {
                    format!("varchar({size})")
                } else {
                    "text".to_string()
                }
            }
            ValueKind::Timestamp => "datetime".to_string(),
            ValueKind::ByteArray(_) | ValueKind::Bytes => "blob".to_string(),
            // No native point type.
            ValueKind::Struct(_)
            | ValueKind::Array { .. }
            | ValueKind::Slice(_)
            | ValueKind::Map
            | ValueKind::Interface => {
                return Err(DialectError::UnsupportedType {
                    dialect: Self::NAME,
                    type_name: value.type_name.clone(),
                    kind: value.kind.name(),
                });
            }
        };
        Ok(ColumnType::new(sql))
    }

    fn primary_key_type(&self, value: &ValueDescriptor, _size: usize) -> Result<ColumnType> {
        // AUTOINCREMENT is only accepted on a column declared exactly INTEGER.
        let sql = match &value.kind {
            ValueKind::Int
            | ValueKind::Int8
            | ValueKind::Int16
            | ValueKind::Int32
            | ValueKind::Uint
            | ValueKind::Uint8
            | ValueKind::Uint16
            | ValueKind::Uint32
            | ValueKind::Uintptr
            | ValueKind::Int64
            | ValueKind::Uint64 => "integer PRIMARY KEY AUTOINCREMENT",
            ValueKind::ByteArray(_) => "blob NOT NULL PRIMARY KEY",
            ValueKind::Bool
            | ValueKind::Float32
            | ValueKind::Float64
            | ValueKind::String
            | ValueKind::Bytes
            | ValueKind::Timestamp
            | ValueKind::Struct(_)
            | ValueKind::Array { .. }
            | ValueKind::Slice(_)
            | ValueKind::Map
            | ValueKind::Interface => {
                return Err(DialectError::InvalidPrimaryKeyType {
                    dialect: Self::NAME,
                    type_name: value.type_name.clone(),
                    kind: value.kind.name(),
                });
            }
        };
        Ok(ColumnType::new(sql))
    }

    fn supports_last_insert_id(&self) -> bool {
        true
    }

    fn schema_name(&self, source: &str) -> Result<String> {
        SqliteDsn::parse(source).map(|_| SqliteDsn::SCHEMA.to_string())
    }

    async fn has_table<S: Scope>(&self, scope: &S, table: &str) -> Result<bool> {
        let count = count_in_child(scope, |child| {
            format!(
                "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = {}",
                child.add_to_vars(table),
            )
        })
        .await?;
        Ok(count > 0)
    }

    async fn has_column<S: Scope>(&self, scope: &S, table: &str, column: &str) -> Result<bool> {
        let count = count_in_child(scope, |child| {
            format!(
                "SELECT count(*) FROM pragma_table_info({}) WHERE name = {}",
                child.add_to_vars(table),
                child.add_to_vars(column),
            )
        })
        .await?;
        Ok(count > 0)
    }

    async fn remove_index<S: Scope>(&self, scope: &mut S, index: &str) -> Result<()> {
        exec_on(scope, format!("DROP INDEX {index}")).await?;
        info!(index = %index, "Dropped index");
        Ok(())
    }
}
