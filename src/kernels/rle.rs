//! This module contains the pure, stateless kernels for a single Run-Length
//! Encoded run of the hybrid format.
//!
//! A run is a varint header `run_length << 1` (low bit clear) followed by the
//! repeated value in `ceil(bit_width / 8)` little-endian bytes. The value is
//! zero-padded before widening, so a 1-byte value `0x05` reads as `5u64`.

use super::bitpack::try_with_capacity;
use super::leb128;
use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};

/// Bytes used to store one RLE value at `bit_width`.
pub fn value_width(bit_width: u8) -> usize {
    (bit_width as usize).div_ceil(8)
}

//==================================================================================
// 1. Public API
//==================================================================================

/// Reads the value of the run described by an already-read `header` and returns
/// `(run_length, value)` without materializing the run.
///
/// Widths up to 64 bits are accepted, matching the bit-packed groups, so values
/// above 32 bits are returned intact. Callers of a 32-bit column cap the width
/// before decoding.
pub fn read_run(cursor: &mut ByteCursor<'_>, header: u64, bit_width: u8) -> Result<(usize, u64)> {
    if header & 1 != 0 {
        return Err(EncodingError::Malformed(format!(
            "RLE run header {} has the bit-packed flag set",
            header
        )));
    }
    if bit_width > 64 {
        return Err(EncodingError::Malformed(format!(
            "bit width {} exceeds 64",
            bit_width
        )));
    }

    let run_length = usize::try_from(header >> 1)
        .map_err(|_| EncodingError::Malformed(format!("RLE run length {} too large", header >> 1)))?;

    let width = value_width(bit_width);
    let available = cursor.remaining();
    if width > available {
        return Err(EncodingError::truncated("RLE run value", width, available));
    }
    let mut padded = [0u8; 8];
    padded[..width].copy_from_slice(cursor.read(width)?);
    Ok((run_length, u64::from_le_bytes(padded)))
}

/// Decodes the run described by an already-read `header`.
pub fn decode_run(cursor: &mut ByteCursor<'_>, header: u64, bit_width: u8) -> Result<Vec<u64>> {
    let (run_length, value) = read_run(cursor, header, bit_width)?;
    let mut out = try_with_capacity(run_length, "RLE run")?;
    out.resize(run_length, value);
    Ok(out)
}

/// Appends a run of `run_length` copies of `value` to `output_buf`.
pub fn encode_run(value: u64, run_length: usize, bit_width: u8, output_buf: &mut Vec<u8>) -> Result<()> {
    if bit_width > 64 {
        return Err(EncodingError::BitpackEncodeError(value, bit_width));
    }
    if bit_width < 64 && value >> bit_width != 0 {
        return Err(EncodingError::BitpackEncodeError(value, bit_width));
    }

    leb128::encode_one((run_length as u64) << 1, output_buf)?;
    let width = value_width(bit_width);
    output_buf.extend_from_slice(&value.to_le_bytes()[..width]);
    Ok(())
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rle_vector_three_fives() {
        let data = [0x05u8];
        let mut cursor = ByteCursor::new(&data);
        let values = decode_run(&mut cursor, 3 << 1, 8).unwrap();
        assert_eq!(values, vec![5, 5, 5]);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_multi_byte_value_is_little_endian() {
        let data = [0x34u8, 0x12];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(decode_run(&mut cursor, 2 << 1, 12).unwrap(), vec![0x1234, 0x1234]);
    }

    #[test]
    fn test_zero_bit_width_reads_no_value_bytes() {
        let mut cursor = ByteCursor::new(&[]);
        assert_eq!(decode_run(&mut cursor, 4 << 1, 0).unwrap(), vec![0; 4]);
    }

    #[test]
    fn test_rle_roundtrip() {
        let mut encoded = Vec::new();
        encode_run(1000, 300, 10, &mut encoded).unwrap();
        // varint(600) = [0xD8, 0x04], value 1000 in two bytes.
        assert_eq!(encoded, vec![0xD8, 0x04, 0xE8, 0x03]);

        let mut cursor = ByteCursor::new(&encoded);
        let header = leb128::read_u64(&mut cursor).unwrap();
        let values = decode_run(&mut cursor, header, 10).unwrap();
        assert_eq!(values, vec![1000; 300]);
    }

    #[test]
    fn test_rle_missing_value_is_truncated() {
        let data = [0x01u8];
        let mut cursor = ByteCursor::new(&data);
        let err = decode_run(&mut cursor, 3 << 1, 16).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_odd_header_is_malformed() {
        let mut cursor = ByteCursor::new(&[0]);
        assert!(matches!(
            decode_run(&mut cursor, 3, 8),
            Err(EncodingError::Malformed(_))
        ));
    }

    #[test]
    fn test_encode_value_too_wide() {
        let mut out = Vec::new();
        assert!(matches!(
            encode_run(16, 2, 4, &mut out),
            Err(EncodingError::BitpackEncodeError(16, 4))
        ));
    }

    #[test]
    fn test_values_wider_than_32_bits_are_kept() {
        // Run of 2 at width 40: five value bytes, nothing truncated to 32 bits.
        let data = [0x05u8, 0x04, 0x03, 0x02, 0x01];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(read_run(&mut cursor, 2 << 1, 40).unwrap(), (2, 0x01_0203_0405));
        assert!(cursor.is_empty());
    }
}
