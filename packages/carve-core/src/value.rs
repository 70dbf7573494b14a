//! Serial type tags and decoded column values.

use std::fmt;

use serde::{Serialize, Serializer};

/// Column serial type read from a record header.
///
/// Stored as the unsigned bit pattern of the header varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SerialType(pub u64);

impl SerialType {
    pub const NULL: SerialType = SerialType(0);
    pub const FLOAT: SerialType = SerialType(7);
    pub const ZERO: SerialType = SerialType(8);
    pub const ONE: SerialType = SerialType(9);

    /// Reinterprets a decoded varint as a serial type.
    pub fn from_varint(value: i64) -> Self {
        SerialType(value as u64)
    }

    /// Serial types 10 and 11 are reserved.
    pub fn is_reserved(self) -> bool {
        matches!(self.0, 10 | 11)
    }

    /// Odd serial types from 13 up hold text.
    pub fn is_text(self) -> bool {
        self.0 >= 13 && self.0 & 1 == 1
    }

    /// Even serial types from 12 up hold blobs.
    pub fn is_blob(self) -> bool {
        self.0 >= 12 && self.0 & 1 == 0
    }

    /// Serial type for a text value of `len` bytes.
    pub fn text(len: u64) -> Self {
        SerialType(len * 2 + 13)
    }

    /// Serial type for a blob value of `len` bytes.
    pub fn blob(len: u64) -> Self {
        SerialType(len * 2 + 12)
    }
}

impl fmt::Display for SerialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded column value.
///
/// Text is kept as raw bytes; the database text encoding is not known from
/// the record alone.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    /// Integer 0 stored in zero bytes
    ConstZero,
    /// Integer 1 stored in zero bytes
    ConstOne,
    Blob(Vec<u8>),
    Text(Vec<u8>),
}

impl Value {
    /// Integer view of the value, folding the zero-width constants.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::ConstZero => Some(0),
            Value::ConstOne => Some(1),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) | Value::Text(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::ConstZero => write!(f, "0"),
            Value::ConstOne => write!(f, "1"),
            Value::Text(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            Value::Blob(bytes) => write!(f, "x'{}'", hex(bytes)),
        }
    }
}

/// Serializes to the natural scalar: integers (constants included) as
/// numbers, text as a lossy UTF-8 string, blobs as a hex string.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::ConstZero => serializer.serialize_i64(0),
            Value::ConstOne => serializer.serialize_i64(1),
            Value::Text(bytes) => serializer.serialize_str(&String::from_utf8_lossy(bytes)),
            Value::Blob(bytes) => serializer.serialize_str(&hex(bytes)),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
