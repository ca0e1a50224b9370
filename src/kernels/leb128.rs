//! This module contains the pure, stateless kernels for performing unsigned
//! LEB128 (Little-Endian Base 128) variable-length integer encoding and decoding.
//!
//! Every header in the hybrid and delta formats is a LEB128 varint: 7 payload bits
//! per byte, low group first, continuation bit `0x80` on all but the last byte.
//! It is fully panic-free.

use num_traits::{PrimInt, Unsigned};

use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};

/// The longest encoding of a `u64`.
pub const MAX_VARINT_LEN_64: usize = 10;

//==================================================================================
// 1. Public API for Single-Value Operations
//==================================================================================

/// Encodes a single unsigned integer into a LEB128 byte sequence, writing to a buffer.
pub fn encode_one<T>(value: T, buffer: &mut Vec<u8>) -> Result<()>
where
    T: PrimInt + Unsigned,
{
    let seven_bit_mask = T::from(0x7F).ok_or_else(|| {
        EncodingError::InvalidValue("Failed to create 7-bit mask for type".to_string())
    })?;

    let mut current_value = value;
    loop {
        let low = (current_value & seven_bit_mask).to_u8().ok_or_else(|| {
            EncodingError::InvalidValue("Failed to convert generic integer to u8".to_string())
        })?;
        current_value = current_value >> 7;

        if current_value.is_zero() {
            buffer.push(low);
            return Ok(());
        }
        buffer.push(low | 0x80);
    }
}

/// Decodes a single unsigned integer from the cursor.
///
/// Running out of bytes before the terminating byte is `Truncated`; a value that
/// does not fit in `T` is `Malformed`.
pub fn decode_one<T>(cursor: &mut ByteCursor<'_>) -> Result<T>
where
    T: PrimInt + Unsigned,
{
    let mut result = T::zero();
    let mut shift = 0usize;
    let total_bits = std::mem::size_of::<T>() * 8;

    loop {
        let byte = cursor
            .read_byte()
            .map_err(|_| EncodingError::truncated("unsigned varint", shift / 7 + 1, shift / 7))?;

        if shift >= total_bits {
            return Err(EncodingError::Malformed(format!(
                "varint exceeds {} bits",
                total_bits
            )));
        }

        let payload = byte & 0x7F;
        // The last group may only fill the bits the type still has room for.
        if shift + 7 > total_bits && (payload >> (total_bits - shift)) != 0 {
            return Err(EncodingError::Malformed(format!(
                "varint overflows {} bits",
                total_bits
            )));
        }

        let seven_bit_payload = T::from(payload).ok_or_else(|| {
            EncodingError::Malformed("Failed to create 7-bit payload from byte".to_string())
        })?;
        result = result | (seven_bit_payload << shift);

        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}

/// Convenience for the common case: a `u64` header field.
pub fn read_u64(cursor: &mut ByteCursor<'_>) -> Result<u64> {
    decode_one::<u64>(cursor)
}

/// Reads a varint header field that is used as an in-memory count or size.
pub fn read_usize(cursor: &mut ByteCursor<'_>, what: &str) -> Result<usize> {
    let raw = read_u64(cursor)?;
    usize::try_from(raw)
        .map_err(|_| EncodingError::Malformed(format!("{} {} does not fit in usize", what, raw)))
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn roundtrip(value: u64) -> (u64, usize) {
        let mut encoded = Vec::new();
        encode_one(value, &mut encoded).unwrap();
        let mut cursor = ByteCursor::new(&encoded);
        let decoded = decode_one::<u64>(&mut cursor).unwrap();
        assert!(cursor.is_empty());
        (decoded, encoded.len())
    }

    #[test]
    fn test_known_encodings() {
        let mut buf = Vec::new();
        encode_one(624485u64, &mut buf).unwrap();
        assert_eq!(buf, vec![0xE5, 0x8E, 0x26]);

        buf.clear();
        encode_one(0u32, &mut buf).unwrap();
        assert_eq!(buf, vec![0x00]);

        buf.clear();
        encode_one(300u32, &mut buf).unwrap();
        assert_eq!(buf, vec![0xAC, 0x02]);
    }

    #[test]
    fn test_leb128_roundtrip_u64_edges() {
        for value in [0, 1, 127, 128, 16383, 16384, u32::MAX as u64, u64::MAX - 1, u64::MAX] {
            let (decoded, len) = roundtrip(value);
            assert_eq!(decoded, value);
            assert!(len <= MAX_VARINT_LEN_64);
        }
        assert_eq!(roundtrip(u64::MAX).1, MAX_VARINT_LEN_64);
    }

    #[test]
    fn test_leb128_roundtrip_random() {
        let mut rng = StdRng::seed_from_u64(0x1EB1_28);
        for _ in 0..2000 {
            // Spread values across all byte lengths.
            let shift = rng.random_range(0..64);
            let value = rng.random::<u64>() >> shift;
            let (decoded, len) = roundtrip(value);
            assert_eq!(decoded, value);
            assert!(len <= MAX_VARINT_LEN_64);
        }
    }

    #[test]
    fn test_decode_truncated_buffer() {
        let mut encoded = Vec::new();
        encode_one(624485u64, &mut encoded).unwrap();
        let mut cursor = ByteCursor::new(&encoded[..2]);
        let err = decode_one::<u64>(&mut cursor).unwrap_err();
        assert!(err.is_truncated());

        let mut empty = ByteCursor::new(&[]);
        assert!(decode_one::<u64>(&mut empty).unwrap_err().is_truncated());
    }

    #[test]
    fn test_decode_overflow_error() {
        // This represents a value larger than u64::MAX
        let encoded = vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        let mut cursor = ByteCursor::new(&encoded);
        assert!(matches!(
            decode_one::<u64>(&mut cursor),
            Err(EncodingError::Malformed(_))
        ));

        // Eleven bytes can never be a u64.
        let encoded = vec![0x80; 11];
        let mut cursor = ByteCursor::new(&encoded);
        assert!(matches!(
            decode_one::<u64>(&mut cursor),
            Err(EncodingError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_u32_overflow() {
        let mut encoded = Vec::new();
        encode_one(u32::MAX as u64 + 1, &mut encoded).unwrap();
        let mut cursor = ByteCursor::new(&encoded);
        assert!(matches!(
            decode_one::<u32>(&mut cursor),
            Err(EncodingError::Malformed(_))
        ));
    }
}
