//! This module contains the pure, stateless kernels for performing
//! fixed-width bit-packing and unpacking.
//!
//! Values are packed least-significant-bit first in groups of 8, so a run of
//! `g` groups at width `w` occupies exactly `g * w` bytes. The hybrid codec, the
//! delta mini-blocks and plain booleans all share this layout. Decoding reads
//! through `BitReader`; encoding builds an Lsb0 `BitVec`.

use bitvec::prelude::*;

use super::bit_reader::BitReader;
use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};

/// Values per bit-packed group.
pub const GROUP_SIZE: usize = 8;

//==================================================================================
// 1. Header Helpers
//==================================================================================

/// The bit-packed run header for `num_groups` groups: `(num_groups << 1) | 1`.
pub fn header_for_groups(num_groups: u64) -> u64 {
    (num_groups << 1) | 1
}

/// The number of groups needed to hold `count` values.
pub fn groups_for(count: usize) -> usize {
    count.div_ceil(GROUP_SIZE)
}

/// Allocates room for `count` decoded values, turning an absurd count taken from
/// untrusted input into an error rather than an abort.
pub(crate) fn try_with_capacity<T>(count: usize, what: &str) -> Result<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve_exact(count).map_err(|_| {
        EncodingError::Malformed(format!("{} count {} is too large to allocate", what, count))
    })?;
    Ok(out)
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Unpacks one bit-packed run described by `header` (`num_groups = header >> 1`).
///
/// Reads exactly `num_groups * bit_width` bytes. A zero bit width yields
/// `num_groups * 8` zeros without consuming input.
pub fn unpack(cursor: &mut ByteCursor<'_>, header: u64, bit_width: u8) -> Result<Vec<u64>> {
    if bit_width > 64 {
        return Err(EncodingError::Malformed(format!(
            "bit width {} exceeds 64",
            bit_width
        )));
    }

    let num_groups = usize::try_from(header >> 1)
        .map_err(|_| EncodingError::Malformed(format!("bit-packed header {} too large", header)))?;
    let count = num_groups.checked_mul(GROUP_SIZE).ok_or_else(|| {
        EncodingError::Malformed(format!("bit-packed group count {} overflows", num_groups))
    })?;

    if count == 0 {
        return Ok(Vec::new());
    }

    if bit_width == 0 {
        let mut out = try_with_capacity(count, "bit-packed value")?;
        out.resize(count, 0);
        return Ok(out);
    }

    let byte_count = num_groups.checked_mul(bit_width as usize).ok_or_else(|| {
        EncodingError::Malformed(format!("bit-packed run of {} groups overflows", num_groups))
    })?;
    let available = cursor.remaining();
    if byte_count > available {
        return Err(EncodingError::truncated(
            "bit-packed run",
            byte_count,
            available,
        ));
    }
    let packed = cursor.read(byte_count)?;

    let mut reader = BitReader::new(packed);
    let mut out = try_with_capacity(count, "bit-packed value")?;
    for _ in 0..count {
        // The byte count was sized for exactly `count` values.
        let value = reader.take(bit_width).ok_or_else(|| {
            EncodingError::truncated("bit-packed value", bit_width as usize, reader.bits_remaining())
        })?;
        out.push(value);
    }
    Ok(out)
}

/// Packs `values` at `bit_width` bits each, zero-padding the final group to 8 values.
///
/// The output is `groups_for(values.len()) * bit_width` bytes long.
pub fn pack(values: &[u64], bit_width: u8) -> Result<Vec<u8>> {
    if bit_width > 64 {
        return Err(EncodingError::BitpackEncodeError(0, bit_width));
    }

    let max_val = if bit_width >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_width) - 1
    };

    let padded_len = groups_for(values.len()) * GROUP_SIZE;
    let mut bit_vec = BitVec::<u8, Lsb0>::with_capacity(padded_len * bit_width as usize);

    for &val in values {
        if val > max_val {
            return Err(EncodingError::BitpackEncodeError(val, bit_width));
        }
        bit_vec.extend_from_bitslice(&val.view_bits::<Lsb0>()[..bit_width as usize]);
    }
    bit_vec.resize(padded_len * bit_width as usize, false);

    Ok(bit_vec.into_vec())
}

/// The minimum bit width able to hold `max_value`.
pub fn bit_width_for(max_value: u64) -> u8 {
    (64 - max_value.leading_zeros()) as u8
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn unpack_all(bytes: &[u8], num_groups: u64, bit_width: u8) -> Result<Vec<u64>> {
        let mut cursor = ByteCursor::new(bytes);
        let values = unpack(&mut cursor, header_for_groups(num_groups), bit_width)?;
        assert!(cursor.is_empty());
        Ok(values)
    }

    #[test]
    fn test_unpack_known_layout() {
        let packed = [0b1000_1000u8, 0b1100_0110, 0b1111_1010];
        let values = unpack_all(&packed, 1, 3).unwrap();
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_pack_known_layout() {
        let packed = pack(&[0, 1, 2, 3, 4, 5, 6, 7], 3).unwrap();
        assert_eq!(packed, vec![0b1000_1000u8, 0b1100_0110, 0b1111_1010]);
    }

    #[test]
    fn test_bitpack_roundtrip_all_widths() {
        let mut rng = StdRng::seed_from_u64(42);
        for bit_width in 0..=32u8 {
            for count in [0usize, 8, 16, 64, 256] {
                let max = if bit_width == 0 { 0 } else { (1u64 << bit_width) - 1 };
                let values: Vec<u64> = (0..count).map(|_| rng.random_range(0..=max)).collect();
                let packed = pack(&values, bit_width).unwrap();
                assert_eq!(packed.len(), count / 8 * bit_width as usize);

                let decoded = unpack_all(&packed, (count / 8) as u64, bit_width).unwrap();
                assert_eq!(decoded, values, "width {} count {}", bit_width, count);
            }
        }
    }

    #[test]
    fn test_roundtrip_64_bit_width() {
        let values: Vec<u64> = vec![u64::MAX, 0, 1, u64::MAX / 3, 5, 6, 7, 8];
        let packed = pack(&values, 64).unwrap();
        assert_eq!(unpack_all(&packed, 1, 64).unwrap(), values);
    }

    #[test]
    fn test_zero_width_consumes_nothing() {
        let data = [0xAAu8];
        let mut cursor = ByteCursor::new(&data);
        let values = unpack(&mut cursor, header_for_groups(2), 0).unwrap();
        assert_eq!(values, vec![0; 16]);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_zero_groups_is_empty() {
        let mut cursor = ByteCursor::new(&[]);
        assert!(unpack(&mut cursor, 1, 7).unwrap().is_empty());
    }

    #[test]
    fn test_partial_group_is_zero_padded() {
        let packed = pack(&[1, 1, 1], 1).unwrap();
        assert_eq!(packed, vec![0b0000_0111]);
        assert_eq!(unpack_all(&packed, 1, 1).unwrap(), vec![1, 1, 1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_truncated_buffer_error() {
        let values = vec![10u64, 20, 30, 1, 2, 3, 4, 5];
        let mut packed = pack(&values, 5).unwrap();
        packed.pop();

        let mut cursor = ByteCursor::new(&packed);
        let err = unpack(&mut cursor, header_for_groups(1), 5).unwrap_err();
        assert!(matches!(
            err,
            EncodingError::Truncated {
                needed: 5,
                available: 4,
                ..
            }
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_huge_header_is_rejected_not_allocated() {
        let mut cursor = ByteCursor::new(&[]);
        let err = unpack(&mut cursor, u64::MAX, 0).unwrap_err();
        assert!(matches!(err, EncodingError::Malformed(_)));
    }

    #[test]
    fn test_encode_value_exceeds_bit_width_error() {
        let err = pack(&[1, 2, 3, 8], 3).unwrap_err();
        assert!(matches!(err, EncodingError::BitpackEncodeError(8, 3)));
    }

    #[test]
    fn test_bit_width_for() {
        assert_eq!(bit_width_for(0), 0);
        assert_eq!(bit_width_for(1), 1);
        assert_eq!(bit_width_for(255), 8);
        assert_eq!(bit_width_for(256), 9);
        assert_eq!(bit_width_for(u64::MAX), 64);
    }
}
