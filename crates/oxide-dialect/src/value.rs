//! Value descriptors and column types.
//!
//! A [`ValueDescriptor`] describes the runtime type of one model field. The
//! ORM builds it from its model definitions, hands it to a dialect, and gets
//! back a [`ColumnType`] holding the DDL fragment for that field.
//!
//! Descriptors for plain Rust types come from [`DescribeValue`]:
//!
//! ```
//! use oxide_dialect::value::{ValueDescriptor, ValueKind};
//!
//! let desc = ValueDescriptor::of::<i64>();
//! assert_eq!(desc.kind, ValueKind::Int64);
//! assert_eq!(desc.type_name, "i64");
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone};

use crate::error::DialectError;

/// The kind of a field's runtime value.
///
/// The set is closed: dialects match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Boolean.
    Bool,
    /// Platform-sized signed integer.
    Int,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Platform-sized unsigned integer.
    Uint,
    /// 8-bit unsigned integer.
    Uint8,
    /// 16-bit unsigned integer.
    Uint16,
    /// 32-bit unsigned integer.
    Uint32,
    /// 64-bit unsigned integer.
    Uint64,
    /// Pointer-sized unsigned integer.
    Uintptr,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// Text.
    String,
    /// Variable-length byte sequence.
    Bytes,
    /// Fixed-size byte array of the given length.
    ByteArray(usize),
    /// Point in time.
    Timestamp,
    /// Any other named struct.
    Struct(String),
    /// Fixed-size array of non-byte elements.
    Array {
        /// Element kind.
        element: Box<ValueKind>,
        /// Number of elements.
        len: usize,
    },
    /// Variable-length sequence of non-byte elements.
    Slice(Box<ValueKind>),
    /// Key/value map.
    Map,
    /// Dynamically typed value.
    Interface,
}

impl ValueKind {
    /// Returns the kind name used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Bytes | Self::Slice(_) => "slice",
            Self::ByteArray(_) | Self::Array { .. } => "array",
            Self::Timestamp | Self::Struct(_) => "struct",
            Self::Map => "map",
            Self::Interface => "interface",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteArray(len) => write!(f, "bytes:{len}"),
            Self::Struct(name) => write!(f, "struct:{name}"),
            Self::Array { element, len } => write!(f, "[{element}; {len}]"),
            Self::Slice(element) => write!(f, "[{element}]"),
            Self::Bytes => f.write_str("bytes"),
            Self::Timestamp => f.write_str("timestamp"),
            other => f.write_str(other.name()),
        }
    }
}

/// Parses the kind names accepted on the command line.
///
/// Scalars use their kind name (`int64`, `string`, ...); `bytes` is a
/// variable-length byte sequence, `bytes:N` a fixed array of `N` bytes,
/// `timestamp` and `geopoint` the two structs dialects know about, and
/// `struct:Name` any other struct.
impl FromStr for ValueKind {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const STRUCT_PREFIX: &str = "struct:";

        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Self::Bool,
            "int" => Self::Int,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint" => Self::Uint,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "uintptr" => Self::Uintptr,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            "timestamp" => Self::Timestamp,
            "geopoint" => Self::Struct(GeoPoint::TYPE_NAME.to_string()),
            "map" => Self::Map,
            "interface" => Self::Interface,
            other => {
                if let Some(len) = other.strip_prefix("bytes:") {
                    let len = len
                        .parse()
                        .map_err(|_| DialectError::UnknownKind(s.to_string()))?;
                    Self::ByteArray(len)
                } else if other.starts_with(STRUCT_PREFIX) {
                    // The prefix matches in any case; the name keeps its own.
                    let name = &s.trim()[STRUCT_PREFIX.len()..];
                    if name.is_empty() {
                        return Err(DialectError::UnknownKind(s.to_string()));
                    }
                    Self::Struct(name.to_string())
                } else {
                    return Err(DialectError::UnknownKind(s.to_string()));
                }
            }
        };
        Ok(kind)
    }
}

/// Describes one model field's runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueDescriptor {
    /// Model-level type name, reported in errors.
    pub type_name: String,
    /// Kind of the value.
    pub kind: ValueKind,
}

impl ValueDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(type_name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
        }
    }

    /// Creates a descriptor named after its kind.
    #[must_use]
    pub fn from_kind(kind: ValueKind) -> Self {
        let type_name = match &kind {
            ValueKind::Struct(name) => name.clone(),
            other => other.to_string(),
        };
        Self { type_name, kind }
    }

    /// Returns the descriptor of a Rust type.
    #[must_use]
    pub fn of<T: DescribeValue + ?Sized>() -> Self {
        Self {
            type_name: T::type_name(),
            kind: T::value_kind(),
        }
    }

    /// Returns the struct name for struct kinds.
    #[must_use]
    pub fn struct_name(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Struct(name) => Some(name),
            _ => None,
        }
    }
}

/// Types that can describe themselves as a model field value.
pub trait DescribeValue {
    /// Returns the kind of the value.
    fn value_kind() -> ValueKind;

    /// Returns the type name reported in errors.
    fn type_name() -> String;
}

macro_rules! describe_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl DescribeValue for $ty {
                fn value_kind() -> ValueKind {
                    ValueKind::$kind
                }

                fn type_name() -> String {
                    stringify!($ty).to_string()
                }
            }
        )*
    };
}

describe_scalar! {
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Int,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    usize => Uint,
    f32 => Float32,
    f64 => Float64,
    String => String,
    str => String,
    Vec<u8> => Bytes,
    NaiveDateTime => Timestamp,
}

impl<const N: usize> DescribeValue for [u8; N] {
    fn value_kind() -> ValueKind {
        ValueKind::ByteArray(N)
    }

    fn type_name() -> String {
        format!("[u8; {N}]")
    }
}

impl<Tz: TimeZone> DescribeValue for DateTime<Tz> {
    fn value_kind() -> ValueKind {
        ValueKind::Timestamp
    }

    fn type_name() -> String {
        "DateTime".to_string()
    }
}

impl<T: DescribeValue> DescribeValue for Option<T> {
    fn value_kind() -> ValueKind {
        T::value_kind()
    }

    fn type_name() -> String {
        T::type_name()
    }
}

/// A geographic point, stored as a native point column where the dialect
/// has one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Struct name dialects recognize.
    pub const TYPE_NAME: &'static str = "GeoPoint";
}

impl DescribeValue for GeoPoint {
    fn value_kind() -> ValueKind {
        ValueKind::Struct(Self::TYPE_NAME.to_string())
    }

    fn type_name() -> String {
        Self::TYPE_NAME.to_string()
    }
}

/// A dialect's DDL type fragment, e.g. `varchar(255)` or `datetime(3) NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnType(String);

impl ColumnType {
    /// Wraps a DDL fragment.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// Returns the fragment.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the column type, returning the fragment.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for ColumnType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<str> for ColumnType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
