//! This module contains the kernels for the plain encoding of every physical type.
//!
//! * booleans: bit-packed at width 1, LSB first, `ceil(n / 8)` bytes
//! * `INT32`/`INT64`/`FLOAT`/`DOUBLE`: little-endian, back to back
//! * `INT96`: 12 opaque bytes per value
//! * `BYTE_ARRAY`: 4-byte little-endian length, then the bytes
//! * `FIXED_LEN_BYTE_ARRAY`: exactly the column's fixed length per value
//!
//! Every decoder reads the exact number of bytes its values need and no more.

use bitvec::prelude::*;

use super::bitpack::{self, try_with_capacity};
use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};
use crate::traits::LeBytes;

const INT96_WIDTH: usize = 12;
const LENGTH_PREFIX_WIDTH: usize = 4;

/// Reads exactly `len` bytes, naming what was being read on failure.
fn read_exact<'a>(cursor: &mut ByteCursor<'a>, len: usize, context: &'static str) -> Result<&'a [u8]> {
    let available = cursor.remaining();
    if len > available {
        return Err(EncodingError::truncated(context, len, available));
    }
    cursor.read(len)
}

fn checked_len(count: usize, width: usize) -> Result<usize> {
    count.checked_mul(width).ok_or_else(|| {
        EncodingError::Malformed(format!("{} values of {} bytes overflow", count, width))
    })
}

//==================================================================================
// 1. Decoding
//==================================================================================

pub fn decode_bool(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<bool>> {
    let num_groups = bitpack::groups_for(count);
    let available = cursor.remaining();
    if num_groups > available {
        return Err(EncodingError::truncated("plain booleans", num_groups, available));
    }
    let bits = bitpack::unpack(cursor, bitpack::header_for_groups(num_groups as u64), 1)?;
    Ok(bits.into_iter().take(count).map(|b| b != 0).collect())
}

/// Decodes `count` little-endian fixed-width numbers.
pub fn decode_le<T: LeBytes>(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<T>> {
    let bytes = read_exact(cursor, checked_len(count, T::WIDTH)?, "plain fixed-width values")?;
    Ok(bytes.chunks_exact(T::WIDTH).map(T::read_le).collect())
}

pub fn decode_int96(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<[u8; INT96_WIDTH]>> {
    let bytes = read_exact(cursor, checked_len(count, INT96_WIDTH)?, "plain INT96 values")?;
    let values: &[[u8; INT96_WIDTH]] = bytemuck::try_cast_slice(bytes)
        .map_err(|e| EncodingError::Malformed(format!("INT96 cast failed: {}", e)))?;
    Ok(values.to_vec())
}

/// Decodes `count` length-prefixed byte arrays.
pub fn decode_byte_array(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<Vec<u8>>> {
    // Each value needs at least its length prefix.
    let mut out = try_with_capacity(count.min(cursor.remaining() / LENGTH_PREFIX_WIDTH), "byte-array value")?;
    for index in 0..count {
        let prefix = read_exact(cursor, LENGTH_PREFIX_WIDTH, "byte-array length")?;
        let raw = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
        let len = usize::try_from(raw).map_err(|_| {
            EncodingError::Malformed(format!("byte-array value {} length {} does not fit in usize", index, raw))
        })?;
        out.push(read_exact(cursor, len, "byte-array value")?.to_vec());
    }
    Ok(out)
}

/// Decodes `count` values of exactly `fixed_length` bytes.
pub fn decode_fixed_len(cursor: &mut ByteCursor<'_>, count: usize, fixed_length: usize) -> Result<Vec<Vec<u8>>> {
    if fixed_length == 0 {
        return Err(EncodingError::InvalidRequest(
            "fixed length must be greater than zero".to_string(),
        ));
    }
    let bytes = read_exact(cursor, checked_len(count, fixed_length)?, "fixed-length byte arrays")?;
    Ok(bytes.chunks_exact(fixed_length).map(<[u8]>::to_vec).collect())
}

//==================================================================================
// 2. Encoding
//==================================================================================

pub fn encode_bool(values: &[bool], output_buf: &mut Vec<u8>) {
    let mut bits = BitVec::<u8, Lsb0>::with_capacity(values.len());
    bits.extend(values.iter().copied());
    bits.resize(bitpack::groups_for(values.len()) * bitpack::GROUP_SIZE, false);
    output_buf.extend_from_slice(&bits.into_vec());
}

pub fn encode_le<T: LeBytes>(values: &[T], output_buf: &mut Vec<u8>) {
    output_buf.reserve(values.len() * T::WIDTH);
    for &v in values {
        v.write_le(output_buf);
    }
}

pub fn encode_int96(values: &[[u8; INT96_WIDTH]], output_buf: &mut Vec<u8>) {
    output_buf.extend_from_slice(bytemuck::cast_slice(values));
}

pub fn encode_byte_array<V: AsRef<[u8]>>(values: &[V], output_buf: &mut Vec<u8>) -> Result<()> {
    for value in values {
        let value = value.as_ref();
        let len = u32::try_from(value.len()).map_err(|_| {
            EncodingError::InvalidValue(format!("byte-array value of {} bytes is too long", value.len()))
        })?;
        output_buf.extend_from_slice(&len.to_le_bytes());
        output_buf.extend_from_slice(value);
    }
    Ok(())
}

pub fn encode_fixed_len<V: AsRef<[u8]>>(values: &[V], fixed_length: usize, output_buf: &mut Vec<u8>) -> Result<()> {
    for value in values {
        let value = value.as_ref();
        if value.len() != fixed_length {
            return Err(EncodingError::InvalidValue(format!(
                "fixed-length value has {} bytes, column expects {}",
                value.len(),
                fixed_length
            )));
        }
        output_buf.extend_from_slice(value);
    }
    Ok(())
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
