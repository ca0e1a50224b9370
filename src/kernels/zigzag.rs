//! This module contains the pure, stateless kernels for performing
//! Zig-zag encoding and decoding.
//!
//! Zig-zag is a lossless, bitwise mapping of signed integers to unsigned integers
//! that keeps small negative values as compact as small positive ones. The delta
//! codecs use it for their first value and per-block minimum delta. This module is
//! PURE RUST and panic-free.

use crate::traits::{HasSigned, HasUnsigned};

/// Signed integers with a zig-zag mapping onto their unsigned counterpart.
pub trait ZigZag: HasUnsigned + Copy {
    /// `(v << 1) ^ (v >> (BITS - 1))`
    fn zigzag(self) -> Self::Unsigned;
    /// `(u >> 1) ^ -(u & 1)`
    fn unzigzag(u: Self::Unsigned) -> Self;
}

macro_rules! impl_zigzag {
    ($S:ty, $U:ty) => {
        impl ZigZag for $S {
            #[inline]
            fn zigzag(self) -> $U {
                // The right shift must be arithmetic.
                ((self << 1) ^ (self >> (<$S>::BITS - 1))) as $U
            }

            #[inline]
            fn unzigzag(u: $U) -> $S {
                ((u >> 1) as $S) ^ (-((u & 1) as $S))
            }
        }
    };
}

impl_zigzag!(i32, u32);
impl_zigzag!(i64, u64);

/// Encodes a single signed integer using the Zig-zag algorithm.
pub fn encode_val<T: ZigZag>(n: T) -> T::Unsigned {
    n.zigzag()
}

/// Decodes a single unsigned integer back to its signed representation.
pub fn decode_val<U>(n: U) -> U::Signed
where
    U: HasSigned,
    U::Signed: ZigZag<Unsigned = U>,
{
    <U::Signed as ZigZag>::unzigzag(n)
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_core_logic_i32() {
        assert_eq!(encode_val(0i32), 0u32);
        assert_eq!(encode_val(-1i32), 1u32);
        assert_eq!(encode_val(1i32), 2u32);
        assert_eq!(encode_val(-2i32), 3u32);

        assert_eq!(decode_val(0u32), 0i32);
        assert_eq!(decode_val(1u32), -1i32);
        assert_eq!(decode_val(2u32), 1i32);
        assert_eq!(decode_val(6u64), 3i64);
    }

    #[test]
    fn test_max_min_values() {
        for v in [i32::MAX, i32::MIN, -1, 0, 1] {
            assert_eq!(decode_val(encode_val(v)), v);
        }
        for v in [i64::MAX, i64::MIN, -1, 0, 1] {
            assert_eq!(decode_val(encode_val(v)), v);
        }
        assert_eq!(encode_val(i64::MIN), u64::MAX);
        assert_eq!(encode_val(i32::MAX), u32::MAX - 1);
    }
}
