//! This module defines shared traits used across different kernels.

/// A trait that maps a signed integer type to its unsigned counterpart.
pub trait HasUnsigned {
    type Unsigned;
}

/// A trait that maps an unsigned integer type to its signed counterpart.
pub trait HasSigned {
    type Signed;
}

// Implement the traits for the integer widths the page encodings use.
macro_rules! impl_signed_unsigned_pair {
    ($S:ty, $U:ty) => {
        impl HasUnsigned for $S {
            type Unsigned = $U;
        }
        impl HasSigned for $U {
            type Signed = $S;
        }
    };
}

impl_signed_unsigned_pair!(i32, u32);
impl_signed_unsigned_pair!(i64, u64);

/// Fixed-width numbers stored little-endian on the page.
pub trait LeBytes: Copy {
    const WIDTH: usize;

    fn write_le(self, out: &mut Vec<u8>);
    /// `bytes` is exactly `WIDTH` long.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_le_bytes {
    ($($T:ty),*) => {
        $(
            impl LeBytes for $T {
                const WIDTH: usize = std::mem::size_of::<$T>();

                #[inline]
                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$T>()];
                    raw.copy_from_slice(bytes);
                    <$T>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_le_bytes!(i32, i64, f32, f64);
