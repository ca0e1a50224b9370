//! This module defines the canonical, type-safe representation of the on-disk
//! physical types a column value can have.

use crate::error::EncodingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The primitive on-disk representation of a column value.
///
/// This enum replaces the format's raw numeric type tag, enabling compile-time
/// checks in the dispatcher instead of runtime type assertions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    /// Legacy 96-bit timestamp, carried as 12 opaque bytes.
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray,
}

impl PhysicalType {
    /// Converts the format's numeric type id into a `PhysicalType`.
    pub fn from_thrift_id(id: i32) -> Result<Self, EncodingError> {
        match id {
            0 => Ok(Self::Boolean),
            1 => Ok(Self::Int32),
            2 => Ok(Self::Int64),
            3 => Ok(Self::Int96),
            4 => Ok(Self::Float),
            5 => Ok(Self::Double),
            6 => Ok(Self::ByteArray),
            7 => Ok(Self::FixedLenByteArray),
            other => Err(EncodingError::InvalidType(format!(
                "Unknown physical type id {}",
                other
            ))),
        }
    }

    /// The format's numeric id for this type.
    pub fn thrift_id(&self) -> i32 {
        match self {
            Self::Boolean => 0,
            Self::Int32 => 1,
            Self::Int64 => 2,
            Self::Int96 => 3,
            Self::Float => 4,
            Self::Double => 5,
            Self::ByteArray => 6,
            Self::FixedLenByteArray => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Int96 => "INT96",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::ByteArray => "BYTE_ARRAY",
            Self::FixedLenByteArray => "FIXED_LEN_BYTE_ARRAY",
        }
    }
}

impl FromStr for PhysicalType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BOOLEAN" => Ok(Self::Boolean),
            "INT32" => Ok(Self::Int32),
            "INT64" => Ok(Self::Int64),
            "INT96" => Ok(Self::Int96),
            "FLOAT" => Ok(Self::Float),
            "DOUBLE" => Ok(Self::Double),
            "BYTE_ARRAY" => Ok(Self::ByteArray),
            "FIXED_LEN_BYTE_ARRAY" => Ok(Self::FixedLenByteArray),
            _ => Err(EncodingError::InvalidType(format!(
                "Unknown physical type name '{}'",
                s
            ))),
        }
    }
}

/// Provides the canonical string representation, matching the format's own names.
impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
