//! The decoded value of a single column slot.

use serde::{Deserialize, Serialize};

use super::PhysicalType;

/// A tagged value, one variant per physical type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum TypedValue {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Int96([u8; 12]),
    Float32(f32),
    Float64(f64),
    ByteArray(Vec<u8>),
    FixedLenByteArray(Vec<u8>),
}

impl TypedValue {
    /// The physical type this value's variant belongs to.
    pub fn physical_type(&self) -> PhysicalType {
        match self {
            Self::Bool(_) => PhysicalType::Boolean,
            Self::Int32(_) => PhysicalType::Int32,
            Self::Int64(_) => PhysicalType::Int64,
            Self::Int96(_) => PhysicalType::Int96,
            Self::Float32(_) => PhysicalType::Float,
            Self::Float64(_) => PhysicalType::Double,
            Self::ByteArray(_) => PhysicalType::ByteArray,
            Self::FixedLenByteArray(_) => PhysicalType::FixedLenByteArray,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Borrows the payload of any of the byte-oriented variants.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::ByteArray(v) | Self::FixedLenByteArray(v) => Some(v),
            Self::Int96(v) => Some(v),
            _ => None,
        }
    }
}
