//! The value encodings a column chunk's metadata can name for a page.
//!
//! The engine never infers an encoding from the bytes themselves: callers read it
//! from the page header and pass it down.

use crate::error::EncodingError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Encoding {
    Plain,
    /// Deprecated dictionary marker; indices use the same layout as `RleDictionary`.
    PlainDictionary,
    /// The RLE/bit-packed hybrid with a 4-byte length prefix.
    Rle,
    /// Deprecated MSB-first packing, recognized but not decoded.
    BitPacked,
    DeltaBinaryPacked,
    DeltaLengthByteArray,
    DeltaByteArray,
    RleDictionary,
    ByteStreamSplit,
}

impl Encoding {
    pub fn from_thrift_id(id: i32) -> Result<Self, EncodingError> {
        match id {
            0 => Ok(Self::Plain),
            2 => Ok(Self::PlainDictionary),
            3 => Ok(Self::Rle),
            4 => Ok(Self::BitPacked),
            5 => Ok(Self::DeltaBinaryPacked),
            6 => Ok(Self::DeltaLengthByteArray),
            7 => Ok(Self::DeltaByteArray),
            8 => Ok(Self::RleDictionary),
            9 => Ok(Self::ByteStreamSplit),
            other => Err(EncodingError::Malformed(format!(
                "Unknown encoding id {}",
                other
            ))),
        }
    }

    pub fn thrift_id(&self) -> i32 {
        match self {
            Self::Plain => 0,
            Self::PlainDictionary => 2,
            Self::Rle => 3,
            Self::BitPacked => 4,
            Self::DeltaBinaryPacked => 5,
            Self::DeltaLengthByteArray => 6,
            Self::DeltaByteArray => 7,
            Self::RleDictionary => 8,
            Self::ByteStreamSplit => 9,
        }
    }

    /// `true` for the two encodings whose pages hold dictionary indices.
    pub fn is_dictionary(&self) -> bool {
        matches!(self, Self::PlainDictionary | Self::RleDictionary)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plain => "PLAIN",
            Self::PlainDictionary => "PLAIN_DICTIONARY",
            Self::Rle => "RLE",
            Self::BitPacked => "BIT_PACKED",
            Self::DeltaBinaryPacked => "DELTA_BINARY_PACKED",
            Self::DeltaLengthByteArray => "DELTA_LENGTH_BYTE_ARRAY",
            Self::DeltaByteArray => "DELTA_BYTE_ARRAY",
            Self::RleDictionary => "RLE_DICTIONARY",
            Self::ByteStreamSplit => "BYTE_STREAM_SPLIT",
        };
        f.write_str(name)
    }
}
