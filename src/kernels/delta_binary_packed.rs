//! This module contains the kernels for the delta-binary-packed integer encoding.
//!
//! Layout:
//! ```text
//! header: <block size> <mini-blocks per block> <total values> <zigzag first value>
//! block:  <zigzag min delta> <bit width of each mini-block, 1 byte each> <mini-blocks>
//! ```
//! Every header field is a varint. Each mini-block holds `block_size / mini-blocks`
//! bit-packed `delta - min_delta` values. Mini-blocks after the last value carry no
//! data, and padding in the final mini-block is discarded.
//!
//! One generic routine serves both the 32-bit and 64-bit physical types; all
//! arithmetic wraps at the integer's own width.

use num_traits::{PrimInt, Signed, WrappingAdd, WrappingSub};
use std::fmt::Debug;

use super::bitpack::{self, try_with_capacity, GROUP_SIZE};
use super::leb128;
use super::zigzag::ZigZag;
use crate::config::DeltaConfig;
use crate::cursor::ByteCursor;
use crate::error::{EncodingError, Result};

//==================================================================================
// 1. Integer Width Abstraction
//==================================================================================

/// The integer widths the delta codec operates on.
pub trait DeltaInteger:
    PrimInt + Signed + WrappingAdd + WrappingSub + ZigZag + Debug + Default
{
    const BITS: u8;

    /// Truncates a decoded varint to this width and undoes the zig-zag mapping.
    fn from_zigzag_u64(raw: u64) -> Self;
    fn to_zigzag_u64(self) -> u64;
    /// Reinterprets the low `BITS` bits of an unpacked delta.
    fn from_packed(raw: u64) -> Self;
    /// The two's-complement bit pattern, zero-extended.
    fn to_packed(self) -> u64;
}

macro_rules! impl_delta_integer {
    ($S:ty, $U:ty) => {
        impl DeltaInteger for $S {
            const BITS: u8 = <$S>::BITS as u8;

            #[inline]
            fn from_zigzag_u64(raw: u64) -> Self {
                <$S as ZigZag>::unzigzag(raw as $U)
            }

            #[inline]
            fn to_zigzag_u64(self) -> u64 {
                self.zigzag() as u64
            }

            #[inline]
            fn from_packed(raw: u64) -> Self {
                raw as $U as $S
            }

            #[inline]
            fn to_packed(self) -> u64 {
                self as $U as u64
            }
        }
    };
}

impl_delta_integer!(i32, u32);
impl_delta_integer!(i64, u64);

//==================================================================================
// 2. Decoding
//==================================================================================

/// The four varint fields that open every delta-binary-packed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    block_size: usize,
    miniblocks_per_block: usize,
    total_values: usize,
    first_value_zigzag: u64,
}

impl Header {
    fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        Ok(Self {
            block_size: leb128::read_usize(cursor, "delta block size")?,
            miniblocks_per_block: leb128::read_usize(cursor, "delta mini-block count")?,
            total_values: leb128::read_usize(cursor, "delta value count")?,
            first_value_zigzag: leb128::read_u64(cursor)?,
        })
    }

    /// Values per mini-block, rejecting layouts the bit packer cannot express.
    fn values_per_miniblock(&self) -> Result<usize> {
        if self.miniblocks_per_block == 0 {
            return Err(EncodingError::Malformed(
                "delta header declares zero mini-blocks per block".to_string(),
            ));
        }
        if self.block_size % self.miniblocks_per_block != 0 {
            return Err(EncodingError::Malformed(format!(
                "delta block size {} is not divisible by {} mini-blocks",
                self.block_size, self.miniblocks_per_block
            )));
        }
        let per = self.block_size / self.miniblocks_per_block;
        if per == 0 || per % GROUP_SIZE != 0 {
            return Err(EncodingError::Malformed(format!(
                "delta mini-block size {} is not a positive multiple of {}",
                per, GROUP_SIZE
            )));
        }
        Ok(per)
    }
}

/// Decodes one delta-binary-packed stream of `T`.
///
/// The value count comes from the stream header; a header declaring more than
/// `max_values` is `Malformed`. On error nothing is returned.
pub fn decode<T: DeltaInteger>(cursor: &mut ByteCursor<'_>, max_values: usize) -> Result<Vec<T>> {
    let header = Header::read(cursor)?;
    let per_miniblock = header.values_per_miniblock()?;
    let total = header.total_values;
    if total > max_values {
        return Err(EncodingError::Malformed(format!(
            "delta header declares {} values, at most {} expected",
            total, max_values
        )));
    }

    let mut out: Vec<T> = try_with_capacity(total, "delta value")?;
    if total == 0 {
        return Ok(out);
    }

    let mut last = T::from_zigzag_u64(header.first_value_zigzag);
    out.push(last);

    let miniblock_header = ((per_miniblock / GROUP_SIZE) as u64) << 1;
    while out.len() < total {
        let min_delta = T::from_zigzag_u64(leb128::read_u64(cursor)?);
        let bit_widths = cursor.read(header.miniblocks_per_block)?;

        for &bit_width in bit_widths {
            if out.len() >= total {
                break;
            }
            if bit_width > T::BITS {
                return Err(EncodingError::Malformed(format!(
                    "mini-block bit width {} exceeds {}-bit integers",
                    bit_width,
                    T::BITS
                )));
            }
            let wanted = per_miniblock.min(total - out.len());
            if bit_width == 0 {
                // Every delta equals `min_delta`; no bytes back the mini-block.
                for _ in 0..wanted {
                    last = last.wrapping_add(&min_delta);
                    out.push(last);
                }
                continue;
            }
            let deltas = bitpack::unpack(cursor, miniblock_header, bit_width)?;
            for raw in deltas.into_iter().take(wanted) {
                last = last
                    .wrapping_add(&T::from_packed(raw))
                    .wrapping_add(&min_delta);
                out.push(last);
            }
        }
    }

    log::trace!(
        "delta decode: {} values of {} bits (block {}, {} mini-blocks)",
        out.len(),
        T::BITS,
        header.block_size,
        header.miniblocks_per_block
    );
    Ok(out)
}

//==================================================================================
// 3. Encoding
//==================================================================================

/// Appends the delta-binary-packed encoding of `values` to `output_buf`.
pub fn encode<T: DeltaInteger>(values: &[T], layout: &DeltaConfig, output_buf: &mut Vec<u8>) -> Result<()> {
    let per_miniblock = layout
        .values_per_miniblock()
        .filter(|per| *per > 0 && per % GROUP_SIZE == 0)
        .ok_or_else(|| {
            EncodingError::InvalidRequest(format!(
                "delta layout of {} values in {} mini-blocks is not encodable",
                layout.block_size, layout.miniblocks_per_block
            ))
        })?;

    let first = values.first().copied().unwrap_or_default();
    leb128::encode_one(layout.block_size as u64, output_buf)?;
    leb128::encode_one(layout.miniblocks_per_block as u64, output_buf)?;
    leb128::encode_one(values.len() as u64, output_buf)?;
    leb128::encode_one(first.to_zigzag_u64(), output_buf)?;

    let deltas: Vec<T> = values
        .windows(2)
        .map(|pair| pair[1].wrapping_sub(&pair[0]))
        .collect();

    for block in deltas.chunks(layout.block_size) {
        // `chunks` never yields an empty slice.
        let min_delta = block.iter().copied().min().unwrap_or_default();
        leb128::encode_one(min_delta.to_zigzag_u64(), output_buf)?;

        let miniblocks: Vec<Vec<u64>> = block
            .chunks(per_miniblock)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|d| d.wrapping_sub(&min_delta).to_packed())
                    .collect()
            })
            .collect();

        let bit_widths: Vec<u8> = (0..layout.miniblocks_per_block)
            .map(|i| {
                miniblocks
                    .get(i)
                    .map(|mb| bitpack::bit_width_for(mb.iter().copied().max().unwrap_or(0)))
                    .unwrap_or(0)
            })
            .collect();
        output_buf.extend_from_slice(&bit_widths);

        for (miniblock, &bit_width) in miniblocks.iter().zip(&bit_widths) {
            let mut padded = miniblock.clone();
            padded.resize(per_miniblock, 0);
            output_buf.extend_from_slice(&bitpack::pack(&padded, bit_width)?);
        }
    }
    Ok(())
}

//==================================================================================
// 4. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn roundtrip<T: DeltaInteger>(values: &[T], layout: DeltaConfig) -> Vec<T> {
        let mut encoded = Vec::new();
        encode(values, &layout, &mut encoded).unwrap();
        let mut cursor = ByteCursor::new(&encoded);
        let decoded = decode::<T>(&mut cursor, values.len()).unwrap();
        assert!(cursor.is_empty(), "decoder must consume the whole stream");
        decoded
    }

    #[test]
    fn test_zero_width_vector() {
        // block 8, 1 mini-block, 5 values, first value zigzag 6 (= 3),
        // min delta 0, bit width 0, no packed bytes.
        let data = [0x08u8, 0x01, 0x05, 0x06, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(decode::<i32>(&mut cursor, 5).unwrap(), vec![3, 3, 3, 3, 3]);
        assert!(cursor.is_empty());

        let mut cursor = ByteCursor::new(&data);
        assert_eq!(decode::<i64>(&mut cursor, 5).unwrap(), vec![3i64; 5]);
    }

    #[test]
    fn test_known_stream_with_min_delta() {
        // Values 7, 5, 3, 1, 2, 3, 4, 5: deltas -2 -2 -2 1 1 1 1, min delta -2.
        let values: Vec<i32> = vec![7, 5, 3, 1, 2, 3, 4, 5];
        let layout = DeltaConfig {
            block_size: 8,
            miniblocks_per_block: 1,
        };
        let mut encoded = Vec::new();
        encode(&values, &layout, &mut encoded).unwrap();
        // header, min delta zigzag(-2) = 3, bit width 2 (max adjusted delta 3),
        // 8 values * 2 bits = 2 bytes.
        assert_eq!(&encoded[..6], &[0x08, 0x01, 0x08, 0x0E, 0x03, 0x02]);
        assert_eq!(encoded.len(), 8);
        assert_eq!(roundtrip(&values, layout), values);
    }

    #[test]
    fn test_empty_and_single_value() {
        assert!(roundtrip::<i64>(&[], DeltaConfig::default()).is_empty());
        assert_eq!(roundtrip(&[-42i32], DeltaConfig::default()), vec![-42]);
    }

    #[test]
    fn test_wrapping_extremes_roundtrip() {
        let values = vec![i32::MIN, i32::MAX, 0, i32::MIN, -1, i32::MAX];
        assert_eq!(roundtrip(&values, DeltaConfig::default()), values);

        let values = vec![i64::MAX, i64::MIN, 0, 1, i64::MIN, i64::MAX];
        assert_eq!(roundtrip(&values, DeltaConfig::default()), values);
    }

    #[test]
    fn test_random_roundtrip_multiple_blocks() {
        let mut rng = StdRng::seed_from_u64(0xDE17A);
        for len in [2usize, 31, 32, 33, 127, 128, 129, 1000] {
            let values: Vec<i64> = (0..len).map(|_| rng.random_range(-1_000_000..1_000_000)).collect();
            assert_eq!(roundtrip(&values, DeltaConfig::default()), values);

            let values: Vec<i32> = (0..len).map(|_| rng.random::<i32>()).collect();
            let layout = DeltaConfig {
                block_size: 256,
                miniblocks_per_block: 8,
            };
            assert_eq!(roundtrip(&values, layout), values);
        }
    }

    #[test]
    fn test_non_dividing_layout_is_malformed() {
        // block 10, 3 mini-blocks.
        let data = [0x0Au8, 0x03, 0x02, 0x00];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            decode::<i32>(&mut cursor, 8),
            Err(EncodingError::Malformed(_))
        ));

        let data = [0x08u8, 0x00, 0x02, 0x00];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            decode::<i32>(&mut cursor, 8),
            Err(EncodingError::Malformed(_))
        ));
    }

    #[test]
    fn test_bit_width_wider_than_type_is_malformed() {
        let data = [0x08u8, 0x01, 0x02, 0x00, 0x00, 33];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            decode::<i32>(&mut cursor, 8),
            Err(EncodingError::Malformed(_))
        ));
    }

    #[test]
    fn test_every_truncation_fails() {
        let values: Vec<i64> = (0..300).map(|i| (i * i) % 97 - 40).collect();
        let mut encoded = Vec::new();
        encode(&values, &DeltaConfig::default(), &mut encoded).unwrap();

        for cut in 0..encoded.len() {
            let mut cursor = ByteCursor::new(&encoded[..cut]);
            let err = decode::<i64>(&mut cursor, values.len()).unwrap_err();
            assert!(err.is_truncated(), "cut at {} gave {:?}", cut, err);
        }
    }

    #[test]
    fn test_header_count_above_cap_is_rejected_before_decoding() {
        // block 2^27, 1 mini-block, 2^27 values, first value 0, min delta 0, width 0:
        // twelve bytes that would otherwise expand to a gigabyte of zeros.
        let data = [
            0x80u8, 0x80, 0x80, 0x40, 0x01, 0x80, 0x80, 0x80, 0x40, 0x00, 0x00, 0x00,
        ];
        let mut cursor = ByteCursor::new(&data);
        let err = decode::<i64>(&mut cursor, 1024).unwrap_err();
        assert!(matches!(err, EncodingError::Malformed(_)), "got {:?}", err);
    }

    #[test]
    fn test_zero_width_miniblock_is_clipped_to_remaining_values() {
        // block 2^27, 1 mini-block, 3 values, first value zigzag 2 (= 1),
        // min delta zigzag 4 (= 2), width 0.
        let data = [0x80u8, 0x80, 0x80, 0x40, 0x01, 0x03, 0x02, 0x04, 0x00];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(decode::<i32>(&mut cursor, 3).unwrap(), vec![1, 3, 5]);
        assert!(cursor.is_empty());
    }
}
