//! This module is the single entry point per direction for page values.
//!
//! `decode_values` and `encode_values` route a (encoding, physical type) pair to
//! the matching kernel in `crate::kernels` and convert between the kernels' native
//! slices and `TypedValue`. `read_plain`/`write_plain` are the plain branch of that
//! routing, total over every physical type.
//!
//! | Encoding                 | Physical types                            |
//! |--------------------------|-------------------------------------------|
//! | `PLAIN`                  | all                                       |
//! | `RLE`                    | `BOOLEAN` (width 1), `INT32` (request width) |
//! | `DELTA_BINARY_PACKED`    | `INT32`, `INT64`                          |
//! | `DELTA_LENGTH_BYTE_ARRAY`| `BYTE_ARRAY`                              |
//! | `DELTA_BYTE_ARRAY`       | `BYTE_ARRAY`, `FIXED_LEN_BYTE_ARRAY`      |
//! | `BYTE_STREAM_SPLIT`      | `FLOAT`, `DOUBLE`, `INT32`, `INT64`, `FIXED_LEN_BYTE_ARRAY` |
//!
//! Dictionary index pages go through `kernels::hybrid::decode_dictionary_indices`
//! instead, because their values are indices rather than column values.

use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};
use crate::kernels::{
    byte_stream_split, delta_binary_packed, delta_byte_array, delta_length_byte_array, hybrid,
    plain,
};
use crate::types::{DecodeRequest, EncodeRequest, Encoding, PhysicalType, TypedValue};

//==================================================================================
// 1. Plain Branch
//==================================================================================

/// Decodes `request.count` plain values of `request.physical_type`.
pub fn read_plain(cursor: &mut ByteCursor<'_>, request: &DecodeRequest) -> Result<Vec<TypedValue>> {
    let count = request.count;
    let values = match request.physical_type {
        PhysicalType::Boolean => wrap(plain::decode_bool(cursor, count)?, TypedValue::Bool),
        PhysicalType::Int32 => wrap(plain::decode_le::<i32>(cursor, count)?, TypedValue::Int32),
        PhysicalType::Int64 => wrap(plain::decode_le::<i64>(cursor, count)?, TypedValue::Int64),
        PhysicalType::Int96 => wrap(plain::decode_int96(cursor, count)?, TypedValue::Int96),
        PhysicalType::Float => wrap(plain::decode_le::<f32>(cursor, count)?, TypedValue::Float32),
        PhysicalType::Double => wrap(plain::decode_le::<f64>(cursor, count)?, TypedValue::Float64),
        PhysicalType::ByteArray => {
            wrap(plain::decode_byte_array(cursor, count)?, TypedValue::ByteArray)
        }
        PhysicalType::FixedLenByteArray => {
            let fixed_length = request.require_fixed_length()?;
            wrap(
                plain::decode_fixed_len(cursor, count, fixed_length)?,
                TypedValue::FixedLenByteArray,
            )
        }
    };
    Ok(values)
}

/// Decodes plain values given the format's numeric physical type id.
///
/// An unknown id is `InvalidType`.
pub fn read_plain_by_id(
    cursor: &mut ByteCursor<'_>,
    type_id: i32,
    count: usize,
    fixed_length: Option<usize>,
) -> Result<Vec<TypedValue>> {
    let mut request = DecodeRequest::new(PhysicalType::from_thrift_id(type_id)?, count);
    request.fixed_length = fixed_length;
    request.validate()?;
    read_plain(cursor, &request)
}

/// Appends the plain encoding of `values` to `output_buf`.
pub fn write_plain(values: &[TypedValue], request: &EncodeRequest, output_buf: &mut Vec<u8>) -> Result<()> {
    match request.physical_type {
        PhysicalType::Boolean => plain::encode_bool(&unwrap_all(values, request, TypedValue::as_bool)?, output_buf),
        PhysicalType::Int32 => plain::encode_le(&unwrap_all(values, request, TypedValue::as_i32)?, output_buf),
        PhysicalType::Int64 => plain::encode_le(&unwrap_all(values, request, TypedValue::as_i64)?, output_buf),
        PhysicalType::Int96 => plain::encode_int96(&unwrap_all(values, request, as_int96)?, output_buf),
        PhysicalType::Float => plain::encode_le(&unwrap_all(values, request, TypedValue::as_f32)?, output_buf),
        PhysicalType::Double => plain::encode_le(&unwrap_all(values, request, TypedValue::as_f64)?, output_buf),
        PhysicalType::ByteArray => {
            plain::encode_byte_array(&borrow_all(values, request)?, output_buf)?
        }
        PhysicalType::FixedLenByteArray => {
            let fixed_length = request.require_fixed_length()?;
            plain::encode_fixed_len(&borrow_all(values, request)?, fixed_length, output_buf)?
        }
    }
    Ok(())
}

//==================================================================================
// 2. Decoding
//==================================================================================

/// Decodes exactly `request.count` values stored with `encoding`.
///
/// Succeeds only with exactly `request.count` values of the requested variant.
pub fn decode_values(
    cursor: &mut ByteCursor<'_>,
    encoding: Encoding,
    request: &DecodeRequest,
) -> Result<Vec<TypedValue>> {
    request.validate()?;
    let start = cursor.position();
    let count = request.count;

    let values = match (encoding, request.physical_type) {
        (Encoding::Plain, _) => read_plain(cursor, request)?,

        (Encoding::Rle, PhysicalType::Boolean) => {
            let raw = hybrid::decode_exact(cursor, 1, None, count)?;
            raw.into_iter().map(|v| TypedValue::Bool(v != 0)).collect()
        }
        (Encoding::Rle, PhysicalType::Int32) => {
            let bit_width = rle_int32_width(request.bit_width)?;
            let raw = hybrid::decode_exact(cursor, bit_width, None, count)?;
            // Bit width <= 32 keeps every value within u32.
            raw.into_iter().map(|v| TypedValue::Int32(v as u32 as i32)).collect()
        }

        (Encoding::DeltaBinaryPacked, PhysicalType::Int32) => {
            let decoded = delta_binary_packed::decode::<i32>(cursor, count)?;
            wrap(expect_count(decoded, count, encoding)?, TypedValue::Int32)
        }
        (Encoding::DeltaBinaryPacked, PhysicalType::Int64) => {
            let decoded = delta_binary_packed::decode::<i64>(cursor, count)?;
            wrap(expect_count(decoded, count, encoding)?, TypedValue::Int64)
        }

        (Encoding::DeltaLengthByteArray, PhysicalType::ByteArray) => {
            let decoded = delta_length_byte_array::decode(cursor, count)?;
            wrap(expect_count(decoded, count, encoding)?, TypedValue::ByteArray)
        }

        (Encoding::DeltaByteArray, PhysicalType::ByteArray) => {
            let decoded = delta_byte_array::decode(cursor, count)?;
            wrap(expect_count(decoded, count, encoding)?, TypedValue::ByteArray)
        }
        (Encoding::DeltaByteArray, PhysicalType::FixedLenByteArray) => {
            let fixed_length = request.require_fixed_length()?;
            let decoded = expect_count(delta_byte_array::decode(cursor, count)?, count, encoding)?;
            if let Some(bad) = decoded.iter().find(|v| v.len() != fixed_length) {
                return Err(EncodingError::Malformed(format!(
                    "fixed-length value of {} bytes in a column of width {}",
                    bad.len(),
                    fixed_length
                )));
            }
            wrap(decoded, TypedValue::FixedLenByteArray)
        }

        (Encoding::ByteStreamSplit, PhysicalType::Float) => {
            wrap(byte_stream_split::decode::<f32>(cursor, count)?, TypedValue::Float32)
        }
        (Encoding::ByteStreamSplit, PhysicalType::Double) => {
            wrap(byte_stream_split::decode::<f64>(cursor, count)?, TypedValue::Float64)
        }
        (Encoding::ByteStreamSplit, PhysicalType::Int32) => {
            wrap(byte_stream_split::decode::<i32>(cursor, count)?, TypedValue::Int32)
        }
        (Encoding::ByteStreamSplit, PhysicalType::Int64) => {
            wrap(byte_stream_split::decode::<i64>(cursor, count)?, TypedValue::Int64)
        }
        (Encoding::ByteStreamSplit, PhysicalType::FixedLenByteArray) => {
            let fixed_length = request.require_fixed_length()?;
            wrap(
                byte_stream_split::decode_fixed(cursor, count, fixed_length)?,
                TypedValue::FixedLenByteArray,
            )
        }

        (encoding, physical_type) => {
            if encoding.is_dictionary() {
                log::debug!("{} pages hold indices; decode them with hybrid::decode_dictionary_indices", encoding);
            }
            return Err(EncodingError::UnsupportedEncoding {
                encoding,
                physical_type,
            });
        }
    };

    log::trace!(
        "decoded {} {} values as {} from {} bytes",
        values.len(),
        request.physical_type,
        encoding,
        cursor.position() - start
    );
    Ok(values)
}

//==================================================================================
// 3. Encoding
//==================================================================================

/// Encodes `values`, all of `request.physical_type`, with `encoding`.
pub fn encode_values(values: &[TypedValue], encoding: Encoding, request: &EncodeRequest) -> Result<Vec<u8>> {
    request.validate()?;
    let mut output_buf = Vec::new();

    match (encoding, request.physical_type) {
        (Encoding::Plain, _) => write_plain(values, request, &mut output_buf)?,

        (Encoding::Rle, PhysicalType::Boolean) => {
            let raw: Vec<u64> = unwrap_all(values, request, TypedValue::as_bool)?
                .into_iter()
                .map(u64::from)
                .collect();
            output_buf = hybrid::encode_with_length_prefix(&raw, 1)?;
        }
        (Encoding::Rle, PhysicalType::Int32) => {
            let bit_width = rle_int32_width(request.bit_width)?;
            let raw: Vec<u64> = unwrap_all(values, request, TypedValue::as_i32)?
                .into_iter()
                .map(|v| v as u32 as u64)
                .collect();
            output_buf = hybrid::encode_with_length_prefix(&raw, bit_width)?;
        }

        (Encoding::DeltaBinaryPacked, PhysicalType::Int32) => delta_binary_packed::encode(
            &unwrap_all(values, request, TypedValue::as_i32)?,
            &request.delta,
            &mut output_buf,
        )?,
        (Encoding::DeltaBinaryPacked, PhysicalType::Int64) => delta_binary_packed::encode(
            &unwrap_all(values, request, TypedValue::as_i64)?,
            &request.delta,
            &mut output_buf,
        )?,

        (Encoding::DeltaLengthByteArray, PhysicalType::ByteArray) => {
            delta_length_byte_array::encode(&borrow_all(values, request)?, &request.delta, &mut output_buf)?
        }

        (Encoding::DeltaByteArray, PhysicalType::ByteArray) => {
            delta_byte_array::encode(&borrow_all(values, request)?, &request.delta, &mut output_buf)?
        }
        (Encoding::DeltaByteArray, PhysicalType::FixedLenByteArray) => {
            let fixed_length = request.require_fixed_length()?;
            let borrowed = borrow_all(values, request)?;
            check_fixed_lengths(&borrowed, fixed_length)?;
            delta_byte_array::encode(&borrowed, &request.delta, &mut output_buf)?
        }

        (Encoding::ByteStreamSplit, PhysicalType::Float) => {
            byte_stream_split::encode(&unwrap_all(values, request, TypedValue::as_f32)?, &mut output_buf)?
        }
        (Encoding::ByteStreamSplit, PhysicalType::Double) => {
            byte_stream_split::encode(&unwrap_all(values, request, TypedValue::as_f64)?, &mut output_buf)?
        }
        (Encoding::ByteStreamSplit, PhysicalType::Int32) => {
            byte_stream_split::encode(&unwrap_all(values, request, TypedValue::as_i32)?, &mut output_buf)?
        }
        (Encoding::ByteStreamSplit, PhysicalType::Int64) => {
            byte_stream_split::encode(&unwrap_all(values, request, TypedValue::as_i64)?, &mut output_buf)?
        }
        (Encoding::ByteStreamSplit, PhysicalType::FixedLenByteArray) => {
            let fixed_length = request.require_fixed_length()?;
            let borrowed = borrow_all(values, request)?;
            check_fixed_lengths(&borrowed, fixed_length)?;
            byte_stream_split::split(&borrowed.concat(), fixed_length, &mut output_buf)?
        }

        (encoding, physical_type) => {
            return Err(EncodingError::UnsupportedEncoding {
                encoding,
                physical_type,
            })
        }
    }

    log::trace!(
        "encoded {} {} values as {} into {} bytes",
        values.len(),
        request.physical_type,
        encoding,
        output_buf.len()
    );
    Ok(output_buf)
}

//==================================================================================
// 4. Helpers
//==================================================================================

fn wrap<T>(values: Vec<T>, variant: fn(T) -> TypedValue) -> Vec<TypedValue> {
    values.into_iter().map(variant).collect()
}

fn as_int96(value: &TypedValue) -> Option<[u8; 12]> {
    match value {
        TypedValue::Int96(v) => Some(*v),
        _ => None,
    }
}

/// Extracts the native payload of every value, rejecting variants of another type.
fn unwrap_all<T>(
    values: &[TypedValue],
    request: &EncodeRequest,
    extract: fn(&TypedValue) -> Option<T>,
) -> Result<Vec<T>> {
    values
        .iter()
        .map(|v| extract(v).ok_or_else(|| mismatched(v, request.physical_type)))
        .collect()
}

/// Borrows the bytes of `BYTE_ARRAY` / `FIXED_LEN_BYTE_ARRAY` values.
fn borrow_all<'a>(values: &'a [TypedValue], request: &EncodeRequest) -> Result<Vec<&'a [u8]>> {
    values
        .iter()
        .map(|v| {
            v.as_bytes()
                .filter(|_| v.physical_type() == request.physical_type)
                .ok_or_else(|| mismatched(v, request.physical_type))
        })
        .collect()
}

fn mismatched(value: &TypedValue, expected: PhysicalType) -> EncodingError {
    EncodingError::InvalidValue(format!(
        "{} value in a {} column",
        value.physical_type(),
        expected
    ))
}

fn check_fixed_lengths(values: &[&[u8]], fixed_length: usize) -> Result<()> {
    match values.iter().find(|v| v.len() != fixed_length) {
        Some(bad) => Err(EncodingError::InvalidValue(format!(
            "fixed-length value has {} bytes, column expects {}",
            bad.len(),
            fixed_length
        ))),
        None => Ok(()),
    }
}

fn rle_int32_width(bit_width: Option<u8>) -> Result<u8> {
    match bit_width {
        Some(width) if width <= 32 => Ok(width),
        Some(width) => Err(EncodingError::InvalidRequest(format!(
            "RLE INT32 bit width {} exceeds 32",
            width
        ))),
        None => Err(EncodingError::InvalidRequest(
            "RLE INT32 pages need a bit width".to_string(),
        )),
    }
}

/// Delta streams carry their own value count; it must agree with the caller's.
fn expect_count<T>(values: Vec<T>, count: usize, encoding: Encoding) -> Result<Vec<T>> {
    if values.len() != count {
        return Err(EncodingError::Malformed(format!(
            "{} page holds {} values, expected {}",
            encoding,
            values.len(),
            count
        )));
    }
    Ok(values)
}
