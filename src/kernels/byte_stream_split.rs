//! This module contains the pure, stateless kernels for the byte-stream-split
//! encoding.
//!
//! A page of `n` values of width `w` is stored as `w` contiguous planes of `n`
//! bytes, plane `k` holding byte `k` (little-endian) of every value. Splitting is a
//! pure byte permutation, so float bit patterns (NaN payloads included) survive
//! exactly.

use super::bitpack::try_with_capacity;
use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};
use crate::traits::LeBytes;

//==================================================================================
// 1. Plane Permutation (The "Engine")
//==================================================================================

/// Reads `count * width` bytes of planes and returns them re-interleaved, i.e. as
/// `count` consecutive little-endian values of `width` bytes.
pub fn unsplit(cursor: &mut ByteCursor<'_>, count: usize, width: usize) -> Result<Vec<u8>> {
    if width == 0 {
        return Err(EncodingError::InvalidRequest(
            "byte-stream-split width must be positive".to_string(),
        ));
    }
    let total = count.checked_mul(width).ok_or_else(|| {
        EncodingError::Malformed(format!("{} values of {} bytes overflow", count, width))
    })?;
    let available = cursor.remaining();
    if total > available {
        return Err(EncodingError::truncated("byte-stream-split planes", total, available));
    }
    let planes = cursor.read(total)?;

    let mut out = try_with_capacity(total, "byte-stream-split byte")?;
    out.resize(total, 0);
    for (k, plane) in planes.chunks_exact(count.max(1)).enumerate().take(width) {
        for (i, &byte) in plane.iter().enumerate() {
            out[i * width + k] = byte;
        }
    }
    Ok(out)
}

/// Appends the planes of `interleaved`, a run of little-endian values of `width`
/// bytes each, to `output_buf`.
pub fn split(interleaved: &[u8], width: usize, output_buf: &mut Vec<u8>) -> Result<()> {
    if width == 0 || interleaved.len() % width != 0 {
        return Err(EncodingError::InvalidValue(format!(
            "{} bytes is not a whole number of {}-byte values",
            interleaved.len(),
            width
        )));
    }
    let count = interleaved.len() / width;
    output_buf.reserve(interleaved.len());
    for k in 0..width {
        output_buf.extend((0..count).map(|i| interleaved[i * width + k]));
    }
    Ok(())
}

//==================================================================================
// 2. Typed API
//==================================================================================

/// Decodes `count` values of `T`.
pub fn decode<T: LeBytes>(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<T>> {
    let bytes = unsplit(cursor, count, T::WIDTH)?;
    Ok(bytes.chunks_exact(T::WIDTH).map(T::read_le).collect())
}

/// Appends the split encoding of `values` to `output_buf`.
pub fn encode<T: LeBytes>(values: &[T], output_buf: &mut Vec<u8>) -> Result<()> {
    let mut interleaved = Vec::with_capacity(values.len() * T::WIDTH);
    for &v in values {
        v.write_le(&mut interleaved);
    }
    split(&interleaved, T::WIDTH, output_buf)
}

/// Decodes `count` fixed-length byte arrays of `width` bytes each.
pub fn decode_fixed(cursor: &mut ByteCursor<'_>, count: usize, width: usize) -> Result<Vec<Vec<u8>>> {
    let bytes = unsplit(cursor, count, width)?;
    Ok(bytes.chunks_exact(width).map(<[u8]>::to_vec).collect())
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
