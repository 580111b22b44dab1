//! MySQL dialect.
//!
//! Targets MySQL 5.6+ (fractional-second `datetime(3)`) and MariaDB.
//! Schema introspection goes through `INFORMATION_SCHEMA`, filtered by the
//! database named in the connection string.

use tracing::info;

use super::{count_in_child, exec_on, Dialect, MAX_VARCHAR_SIZE};
use crate::connection::MysqlDsn;
use crate::error::{DialectError, Result};
use crate::scope::Scope;
use crate::value::{ColumnType, GeoPoint, ValueDescriptor, ValueKind};

/// MySQL dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MysqlDialect;

impl MysqlDialect {
    const NAME: &'static str = "mysql";

    /// Creates a new MySQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn unsupported(value: &ValueDescriptor) -> DialectError {
        DialectError::UnsupportedType {
            dialect: Self::NAME,
            type_name: value.type_name.clone(),
            kind: value.kind.name(),
        }
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn column_type(&self, value: &ValueDescriptor, size: usize) -> Result<ColumnType> {
        let sql = match &value.kind {
            ValueKind::Bool => "boolean".to_string(),
            ValueKind::Int
            | ValueKind::Int8
            | ValueKind::Int16
            | ValueKind::Int32
            | ValueKind::Uint
            | ValueKind::Uint8
            | ValueKind::Uint16
            | ValueKind::Uint32
            | ValueKind::Uintptr => "int".to_string(),
            ValueKind::Int64 | ValueKind::Uint64 => "bigint".to_string(),
            ValueKind::Float32 | ValueKind::Float64 => "double".to_string(),
            ValueKind::String => {
                if size > 0 && size < MAX_VARCHAR_SIZE {
                    format!("varchar({size})")
                } else {
                    "longtext".to_string()
                }
            }
            ValueKind::Timestamp => "datetime(3) NULL".to_string(),
            ValueKind::Struct(name) if name == GeoPoint::TYPE_NAME => "point".to_string(),
            ValueKind::ByteArray(len) => format!("binary({len})"),
            ValueKind::Bytes => {
                if size > 0 && size < MAX_VARCHAR_SIZE {
                    format!("varbinary({size})")
                } else {
                    "longblob".to_string()
                }
            }
            ValueKind::Struct(_)
            | ValueKind::Array { .. }
            | ValueKind::Slice(_)
            | ValueKind::Map
            | ValueKind::Interface => return Err(Self::unsupported(value)),
        };
        Ok(ColumnType::new(sql))
    }

    fn primary_key_type(&self, value: &ValueDescriptor, _size: usize) -> Result<ColumnType> {
        const SUFFIX: &str = " NOT NULL AUTO_INCREMENT PRIMARY KEY";

        let sql = match &value.kind {
            ValueKind::Int
            | ValueKind::Int8
            | ValueKind::Int16
            | ValueKind::Int32
            | ValueKind::Uint
            | ValueKind::Uint8
            | ValueKind::Uint16
            | ValueKind::Uint32
            | ValueKind::Uintptr => format!("int{SUFFIX}"),
            ValueKind::Int64 | ValueKind::Uint64 => format!("bigint{SUFFIX}"),
            ValueKind::ByteArray(len) => format!("binary({len}) NOT NULL PRIMARY KEY"),
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

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn dummy_table_clause(&self) -> &'static str {
        "FROM DUAL"
    }

    fn schema_name(&self, source: &str) -> Result<String> {
        MysqlDsn::parse(source).map(|dsn| dsn.database)
    }

    async fn has_table<S: Scope>(&self, scope: &S, table: &str) -> Result<bool> {
        let schema = self.resolve_schema_name(scope)?;
        let count = count_in_child(scope, |child| {
            format!(
                "SELECT count(*) FROM INFORMATION_SCHEMA.tables where table_name = {} AND table_schema = {}",
                child.add_to_vars(table),
                child.add_to_vars(schema),
            )
        })
        .await?;
        Ok(count > 0)
    }

    async fn has_column<S: Scope>(&self, scope: &S, table: &str, column: &str) -> Result<bool> {
        let schema = self.resolve_schema_name(scope)?;
        let count = count_in_child(scope, |child| {
            format!(
                "SELECT count(*) FROM information_schema.columns WHERE table_schema = {} AND table_name = {} AND column_name = {}",
                child.add_to_vars(schema),
                child.add_to_vars(table),
                child.add_to_vars(column),
            )
        })
        .await?;
        Ok(count > 0)
    }

    async fn remove_index<S: Scope>(&self, scope: &mut S, index: &str) -> Result<()> {
        let table = scope.quoted_table_name()?;
        exec_on(scope, format!("DROP INDEX {index} ON {table}")).await?;
        info!(index = %index, table = %table, "Dropped index");
        Ok(())
    }
}
