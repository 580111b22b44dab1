//! PostgreSQL dialect.

use tracing::info;

use super::{count_in_child, exec_on, Dialect, MAX_VARCHAR_SIZE};
use crate::connection::PostgresDsn;
use crate::error::{DialectError, Result};
use crate::scope::Scope;
use crate::value::{ColumnType, GeoPoint, ValueDescriptor, ValueKind};

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostgresDialect;

impl PostgresDialect {
    const NAME: &'static str = "postgres";

    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for PostgresDialect {
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
            | ValueKind::Uintptr => "integer".to_string(),
            ValueKind::Int64 | ValueKind::Uint64 => "bigint".to_string(),
            ValueKind::Float32 | ValueKind::Float64 => "double precision".to_string(),
            ValueKind::String => {
                if size > 0 && size < MAX_VARCHAR_SIZE {
                    format!("varchar({size})")
                } else {
                    "text".to_string()
                }
            }
            ValueKind::Timestamp => "timestamp with time zone".to_string(),
            ValueKind::Struct(name) if name == GeoPoint::TYPE_NAME => "point".to_string(),
            ValueKind::ByteArray(_) | ValueKind::Bytes => "bytea".to_string(),
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
        let sql = match &value.kind {
            ValueKind::Int
            | ValueKind::Int8
            | ValueKind::Int16
            | ValueKind::Int32
            | ValueKind::Uint
            | ValueKind::Uint8
            | ValueKind::Uint16
            | ValueKind::Uint32
            | ValueKind::Uintptr => "serial PRIMARY KEY",
            ValueKind::Int64 | ValueKind::Uint64 => "bigserial PRIMARY KEY",
            ValueKind::ByteArray(_) => "bytea NOT NULL PRIMARY KEY",
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
        false
    }

    fn returning_clause(&self, table: &str, key: &str) -> String {
        format!(
            "RETURNING {}.{}",
            self.quote_identifier(table),
            self.quote_identifier(key)
        )
    }

    fn bind_placeholder(&self, ordinal: usize) -> String {
        format!("${ordinal}")
    }

    fn schema_name(&self, source: &str) -> Result<String> {
        PostgresDsn::parse(source).map(|dsn| dsn.database)
    }

    async fn has_table<S: Scope>(&self, scope: &S, table: &str) -> Result<bool> {
        let count = count_in_child(scope, |child| {
            format!(
                "SELECT count(*) FROM INFORMATION_SCHEMA.tables WHERE table_name = {} AND table_schema = current_schema() AND table_type = 'BASE TABLE'",
                child.add_to_vars(table),
            )
        })
        .await?;
        Ok(count > 0)
    }

    async fn has_column<S: Scope>(&self, scope: &S, table: &str, column: &str) -> Result<bool> {
        let count = count_in_child(scope, |child| {
            format!(
                "SELECT count(*) FROM INFORMATION_SCHEMA.columns WHERE table_schema = current_schema() AND table_name = {} AND column_name = {}",
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

#[cfg(test)]
mod tests {
    use super::*;

    fn column(kind: ValueKind, size: usize) -> Result<ColumnType> {
        PostgresDialect::new().column_type(&ValueDescriptor::from_kind(kind), size)
    }

    #[test]
    fn test_column_types() {
        assert_eq!(column(ValueKind::Bool, 0).unwrap(), "boolean");
        assert_eq!(column(ValueKind::Uint16, 0).unwrap(), "integer");
        assert_eq!(column(ValueKind::Int64, 0).unwrap(), "bigint");
        assert_eq!(column(ValueKind::Float32, 0).unwrap(), "double precision");
        assert_eq!(column(ValueKind::String, 300).unwrap(), "varchar(300)");
        assert_eq!(column(ValueKind::String, 0).unwrap(), "text");
        assert_eq!(
            column(ValueKind::Timestamp, 0).unwrap(),
            "timestamp with time zone"
        );
        assert_eq!(column(ValueKind::Bytes, 10).unwrap(), "bytea");
        assert_eq!(column(ValueKind::ByteArray(16), 0).unwrap(), "bytea");
        assert_eq!(
            column(ValueKind::Struct("GeoPoint".to_string()), 0).unwrap(),
            "point"
        );
        assert!(matches!(
            column(ValueKind::Map, 0),
            Err(DialectError::UnsupportedType {
                dialect: "postgres",
                ..
            })
        ));
    }

    #[test]
    fn test_primary_keys() {
        let d = PostgresDialect::new();
        let pk = |kind| d.primary_key_type(&ValueDescriptor::from_kind(kind), 0);
        assert_eq!(pk(ValueKind::Int32).unwrap(), "serial PRIMARY KEY");
        assert_eq!(pk(ValueKind::Int64).unwrap(), "bigserial PRIMARY KEY");
        assert_eq!(
            pk(ValueKind::ByteArray(16)).unwrap(),
            "bytea NOT NULL PRIMARY KEY"
        );
        assert!(pk(ValueKind::String).is_err());
    }

    #[test]
    fn test_syntax() {
        let d = PostgresDialect::new();
        assert_eq!(d.quote_identifier("user"), "\"user\"");
        assert_eq!(d.bind_placeholder(1), "$1");
        assert_eq!(d.bind_placeholder(12), "$12");
        assert_eq!(d.returning_clause("users", "id"), "RETURNING \"users\".\"id\"");
        assert_eq!(d.dummy_table_clause(), "");
        assert!(!d.supports_last_insert_id());
        assert!(!d.supports_top());
    }

    #[test]
    fn test_schema_name() {
        let d = PostgresDialect::new();
        assert_eq!(
            d.schema_name("postgres://app@localhost:5432/shop").unwrap(),
            "shop"
        );
        assert_eq!(d.schema_name("host=db dbname=shop").unwrap(), "shop");
    }
}
