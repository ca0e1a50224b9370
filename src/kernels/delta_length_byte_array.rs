//! This module contains the kernels for the delta-length byte-array encoding.
//!
//! All value lengths come first as one delta-binary-packed `i64` stream, followed
//! by the concatenated value bytes. Empty values consume no data bytes.

use super::bitpack::try_with_capacity;
use super::delta_binary_packed;
use crate::config::DeltaConfig;
use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};

//==================================================================================
// 1. Public API
//==================================================================================

/// Decodes every value declared by the embedded length stream, at most `max_values`.
pub fn decode(cursor: &mut ByteCursor<'_>, max_values: usize) -> Result<Vec<Vec<u8>>> {
    let lengths = delta_binary_packed::decode::<i64>(cursor, max_values)?;

    let mut out = try_with_capacity(lengths.len(), "byte-array value")?;
    for (index, &len) in lengths.iter().enumerate() {
        let len = usize::try_from(len).map_err(|_| {
            EncodingError::Malformed(format!("byte-array value {} has negative length {}", index, len))
        })?;
        if len == 0 {
            out.push(Vec::new());
            continue;
        }
        let available = cursor.remaining();
        if len > available {
            return Err(EncodingError::truncated("byte-array value", len, available));
        }
        out.push(cursor.read(len)?.to_vec());
    }
    Ok(out)
}

/// Appends the delta-length encoding of `values` to `output_buf`.
pub fn encode<V: AsRef<[u8]>>(values: &[V], layout: &DeltaConfig, output_buf: &mut Vec<u8>) -> Result<()> {
    let lengths = values
        .iter()
        .map(|v| {
            i64::try_from(v.as_ref().len())
                .map_err(|_| EncodingError::InvalidValue("byte-array value too long".to_string()))
        })
        .collect::<Result<Vec<i64>>>()?;

    delta_binary_packed::encode(&lengths, layout, output_buf)?;
    for value in values {
        output_buf.extend_from_slice(value.as_ref());
    }
    Ok(())
}

//==================================================================================
// 2. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(values: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        encode(values, &DeltaConfig::default(), &mut out).unwrap();
        out
    }

    #[test]
    fn test_roundtrip_with_empty_values() {
        let values: [&[u8]; 5] = [b"hello", b"", b"world", b"", b"!"];
        let bytes = encoded(&values);
        let mut cursor = ByteCursor::new(&bytes);
        let decoded = decode(&mut cursor, 16).unwrap();
        assert_eq!(decoded, values.iter().map(|v| v.to_vec()).collect::<Vec<_>>());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_data_follows_lengths() {
        let bytes = encoded(&[b"ab", b"cde"]);
        assert!(bytes.ends_with(b"abcde"));
    }

    #[test]
    fn test_empty_page() {
        let bytes = encoded(&[]);
        let mut cursor = ByteCursor::new(&bytes);
        assert!(decode(&mut cursor, 16).unwrap().is_empty());
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_negative_length_is_malformed() {
        // block 128, 4 mini-blocks, 1 value, first value zigzag(-1) = 1.
        let data = [0x80u8, 0x01, 0x04, 0x01, 0x01];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(decode(&mut cursor, 16), Err(EncodingError::Malformed(_))));
    }

    #[test]
    fn test_every_truncation_fails() {
        let bytes = encoded(&[b"parquet", b"", b"pages", b"x"]);
        for cut in 0..bytes.len() {
            let mut cursor = ByteCursor::new(&bytes[..cut]);
            let err = decode(&mut cursor, 16).unwrap_err();
            assert!(err.is_truncated(), "cut at {} gave {:?}", cut, err);
        }
    }

    #[test]
    fn test_more_values_than_expected_is_malformed() {
        let bytes = encoded(&[b"a", b"b", b"c"]);
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(decode(&mut cursor, 2), Err(EncodingError::Malformed(_))));
    }
}
