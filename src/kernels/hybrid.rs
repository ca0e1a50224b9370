//! This module contains the kernels for the RLE/bit-packing hybrid framing.
//!
//! The encoded region is an independent sub-stream of runs. Each run starts with a
//! varint header: a clear low bit selects an RLE run (`rle`), a set low bit selects
//! `header >> 1` bit-packed groups of 8 values (`bitpack`). The format encodes no
//! value count; a decoder keeps reading runs until the region is exhausted and the
//! caller keeps only as many leading values as its column metadata says exist.
//!
//! Framing:
//! ```text
//! [ length: i32 LE ]? [ header varint | payload ] [ header varint | payload ] ...
//! ```
//! The length prefix is present unless the caller supplies the length itself
//! (e.g. dictionary index pages, where the region runs to the end of the page).

use super::bitpack::{self, try_with_capacity, GROUP_SIZE};
use super::leb128;
use super::rle;
use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};

/// Minimum run of equal values the encoder stores as an RLE run.
const MIN_RLE_RUN: usize = 8;

//==================================================================================
// 1. Decoding
//==================================================================================

/// Reads the 4-byte little-endian length that precedes a length-prefixed region.
pub fn read_length_prefix(cursor: &mut ByteCursor<'_>) -> Result<usize> {
    let raw = i32::from_le_bytes(cursor.read_array::<4>()?);
    usize::try_from(raw)
        .map_err(|_| EncodingError::Malformed(format!("negative hybrid region length {}", raw)))
}

/// Decodes every run in the region.
///
/// With `length == None` the region length is read from a 4-byte prefix first.
/// The cursor ends up exactly past the region.
pub fn decode(cursor: &mut ByteCursor<'_>, bit_width: u8, length: Option<usize>) -> Result<Vec<u64>> {
    decode_limited(cursor, bit_width, length, usize::MAX)
}

/// Like [`decode`], but materializes at most `max_values` values.
///
/// The whole region is still consumed and validated; only the output is clipped.
/// Callers that know their value count use this so a hostile run header cannot
/// make the decoder allocate far beyond what the page can legitimately hold.
pub fn decode_limited(
    cursor: &mut ByteCursor<'_>,
    bit_width: u8,
    length: Option<usize>,
    max_values: usize,
) -> Result<Vec<u64>> {
    if bit_width > 64 {
        return Err(EncodingError::Malformed(format!(
            "bit width {} exceeds 64",
            bit_width
        )));
    }

    let length = match length {
        Some(len) => len,
        None => read_length_prefix(cursor)?,
    };
    let mut sub = cursor.sub_cursor(length)?;

    let mut out: Vec<u64> = Vec::new();
    let mut runs = 0usize;
    while !sub.is_empty() {
        let header = leb128::read_u64(&mut sub)?;
        let room = max_values - out.len();

        if header & 1 == 0 {
            let (run_length, value) = rle::read_run(&mut sub, header, bit_width)?;
            let keep = run_length.min(room);
            out.try_reserve(keep).map_err(|_| {
                EncodingError::Malformed(format!("RLE run of {} values too large", run_length))
            })?;
            out.resize(out.len() + keep, value);
        } else if bit_width == 0 {
            // Zero-width groups carry no bytes; only their count matters.
            let count = usize::try_from(header >> 1)
                .ok()
                .and_then(|groups| groups.checked_mul(GROUP_SIZE))
                .ok_or_else(|| {
                    EncodingError::Malformed(format!("bit-packed header {} too large", header))
                })?;
            let keep = count.min(room);
            out.try_reserve(keep).map_err(|_| {
                EncodingError::Malformed(format!("bit-packed run of {} values too large", count))
            })?;
            out.resize(out.len() + keep, 0);
        } else {
            let values = bitpack::unpack(&mut sub, header, bit_width)?;
            let keep = values.len().min(room);
            out.extend_from_slice(&values[..keep]);
        }
        runs += 1;
    }

    log::trace!(
        "hybrid decode: {} bytes, {} runs, {} values at bit width {}",
        length,
        runs,
        out.len(),
        bit_width
    );
    Ok(out)
}

/// Decodes exactly `count` values, failing with `Truncated` if the region holds fewer.
pub fn decode_exact(
    cursor: &mut ByteCursor<'_>,
    bit_width: u8,
    length: Option<usize>,
    count: usize,
) -> Result<Vec<u64>> {
    let mut values = decode_limited(cursor, bit_width, length, count)?;
    if values.len() < count {
        return Err(EncodingError::truncated(
            "rle/bit-packed hybrid values",
            count,
            values.len(),
        ));
    }
    values.truncate(count);
    Ok(values)
}

//==================================================================================
// 2. Encoding
//==================================================================================

/// Length of the run of equal values starting at `start`.
fn run_length_at(values: &[u64], start: usize) -> usize {
    let first = values[start];
    values[start..].iter().take_while(|&&v| v == first).count()
}

/// Writes the pending values as one bit-packed run, zero-padding the last group.
fn flush_bit_packed(pending: &mut Vec<u64>, bit_width: u8, output_buf: &mut Vec<u8>) -> Result<()> {
    if pending.is_empty() {
        return Ok(());
    }
    let groups = bitpack::groups_for(pending.len()) as u64;
    leb128::encode_one(bitpack::header_for_groups(groups), output_buf)?;
    output_buf.extend_from_slice(&bitpack::pack(pending, bit_width)?);
    pending.clear();
    Ok(())
}

/// Encodes `values` as a hybrid region without a length prefix.
///
/// Runs of at least 8 equal values that start on a group boundary become RLE runs;
/// everything else is bit-packed.
pub fn encode(values: &[u64], bit_width: u8) -> Result<Vec<u8>> {
    let mut output_buf = Vec::new();
    let mut pending: Vec<u64> = Vec::with_capacity(GROUP_SIZE);

    let mut i = 0;
    while i < values.len() {
        let run = run_length_at(values, i);
        if run >= MIN_RLE_RUN && pending.len() % GROUP_SIZE == 0 {
            flush_bit_packed(&mut pending, bit_width, &mut output_buf)?;
            rle::encode_run(values[i], run, bit_width, &mut output_buf)?;
            i += run;
        } else {
            pending.push(values[i]);
            i += 1;
        }
    }
    flush_bit_packed(&mut pending, bit_width, &mut output_buf)?;
    Ok(output_buf)
}

/// Encodes `values` preceded by the 4-byte little-endian region length.
pub fn encode_with_length_prefix(values: &[u64], bit_width: u8) -> Result<Vec<u8>> {
    let body = encode(values, bit_width)?;
    let length = i32::try_from(body.len()).map_err(|_| {
        EncodingError::InvalidValue(format!("hybrid region of {} bytes is too long", body.len()))
    })?;
    let mut output_buf = Vec::with_capacity(body.len() + 4);
    output_buf.extend_from_slice(&length.to_le_bytes());
    output_buf.extend_from_slice(&body);
    Ok(output_buf)
}

//==================================================================================
// 3. Dictionary Indices
//==================================================================================

/// Decodes `count` dictionary indices: one bit-width byte, then a hybrid region
/// running to the end of the buffer.
pub fn decode_dictionary_indices(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<u32>> {
    let bit_width = cursor.read_byte()?;
    if bit_width > 32 {
        return Err(EncodingError::Malformed(format!(
            "dictionary index bit width {} exceeds 32",
            bit_width
        )));
    }
    let length = cursor.remaining();
    let values = decode_exact(cursor, bit_width, Some(length), count)?;
    let mut indices = try_with_capacity(values.len(), "dictionary index")?;
    // Bit width <= 32 guarantees every value fits.
    indices.extend(values.into_iter().map(|v| v as u32));
    Ok(indices)
}

/// Encodes dictionary indices with the smallest bit width that holds the largest one.
pub fn encode_dictionary_indices(indices: &[u32]) -> Result<Vec<u8>> {
    let max = indices.iter().copied().max().unwrap_or(0);
    let bit_width = bitpack::bit_width_for(max as u64);
    let widened: Vec<u64> = indices.iter().map(|&i| i as u64).collect();

    let mut output_buf = vec![bit_width];
    output_buf.extend_from_slice(&encode(&widened, bit_width)?);
    Ok(output_buf)
}

//==================================================================================
// 4. Unit Tests
//==================================================================================
