//! This module contains the kernels for the incremental (front-coded) byte-array
//! encoding.
//!
//! Layout: a delta-binary-packed `i64` stream of prefix lengths, then the suffixes
//! as a delta-length byte-array stream. Value `i` is the first `prefix[i]` bytes of
//! value `i - 1` followed by `suffix[i]`, so decoding is strictly sequential.

use super::bitpack::try_with_capacity;
use super::{delta_binary_packed, delta_length_byte_array};
use crate::config::DeltaConfig;
use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};

//==================================================================================
// 1. Public API
//==================================================================================

/// Decodes every value declared by the embedded prefix stream, at most `max_values`.
pub fn decode(cursor: &mut ByteCursor<'_>, max_values: usize) -> Result<Vec<Vec<u8>>> {
    let prefixes = delta_binary_packed::decode::<i64>(cursor, max_values)?;
    let suffixes = delta_length_byte_array::decode(cursor, max_values)?;
    if prefixes.len() != suffixes.len() {
        return Err(EncodingError::Malformed(format!(
            "{} prefix lengths but {} suffixes",
            prefixes.len(),
            suffixes.len()
        )));
    }

    let mut out: Vec<Vec<u8>> = try_with_capacity(prefixes.len(), "byte-array value")?;
    for (index, (&prefix_len, suffix)) in prefixes.iter().zip(suffixes).enumerate() {
        let previous: &[u8] = out.last().map(|v| v.as_slice()).unwrap_or(&[]);
        let prefix_len = usize::try_from(prefix_len)
            .ok()
            .filter(|len| *len <= previous.len())
            .ok_or_else(|| {
                EncodingError::Malformed(format!(
                    "value {} shares {} bytes with a {}-byte predecessor",
                    index,
                    prefix_len,
                    previous.len()
                ))
            })?;

        let mut value = Vec::with_capacity(prefix_len + suffix.len());
        value.extend_from_slice(&previous[..prefix_len]);
        value.extend_from_slice(&suffix);
        out.push(value);
    }
    Ok(out)
}

/// Appends the front-coded encoding of `values` to `output_buf`.
pub fn encode<V: AsRef<[u8]>>(values: &[V], layout: &DeltaConfig, output_buf: &mut Vec<u8>) -> Result<()> {
    let mut prefixes = Vec::with_capacity(values.len());
    let mut suffixes: Vec<&[u8]> = Vec::with_capacity(values.len());

    let mut previous: &[u8] = &[];
    for value in values {
        let value = value.as_ref();
        let shared = previous
            .iter()
            .zip(value)
            .take_while(|(a, b)| a == b)
            .count();
        prefixes.push(shared as i64);
        suffixes.push(&value[shared..]);
        previous = value;
    }

    delta_binary_packed::encode(&prefixes, layout, output_buf)?;
    delta_length_byte_array::encode(&suffixes, layout, output_buf)
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
