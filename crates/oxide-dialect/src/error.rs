//! Error types for dialect adapters.

use thiserror::Error;

/// Errors raised while translating or introspecting through a dialect.
#[derive(Debug, Error)]
pub enum DialectError {
    /// The value kind has no column type in this dialect.
    ///
    /// This points at a model definition the dialect cannot store; schema
    /// generation should stop and report it.
    #[error("unsupported type {type_name} ({kind}) for {dialect}")]
    UnsupportedType {
        /// Dialect that rejected the type.
        dialect: &'static str,
        /// Model-level type name.
        type_name: String,
        /// Kind name of the value.
        kind: &'static str,
    },

    /// The value kind cannot be used as a primary key in this dialect.
    #[error("invalid primary key type {type_name} ({kind}) for {dialect}")]
    InvalidPrimaryKeyType {
        /// Dialect that rejected the type.
        dialect: &'static str,
        /// Model-level type name.
        type_name: String,
        /// Kind name of the value.
        kind: &'static str,
    },

    /// The connection string does not carry what the dialect needs.
    #[error("invalid {dialect} connection string: {reason}")]
    InvalidConnectionString {
        /// Dialect that parsed the string.
        dialect: &'static str,
        /// What was missing or malformed.
        reason: String,
    },

    /// No dialect is registered under this name.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    /// No value kind is registered under this name.
    #[error("unknown value kind: {0}")]
    UnknownKind(String),

    /// The scope is not bound to a table.
    #[error("scope has no table")]
    MissingTable,

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;
