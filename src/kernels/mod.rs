//! This module declares the collection of pure, stateless page-encoding kernels.
//!
//! Every kernel reads from a `ByteCursor` and appends to a `Vec<u8>`; none of
//! them know about physical types. Routing a (physical type, encoding) pair to a
//! kernel is the job of `crate::dispatch`.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Primitives: varints, zig-zag and the bit cursor.
pub mod bit_reader;
pub mod leb128;
pub mod zigzag;

/// Bit-width reduction
pub mod bitpack;
pub mod hybrid;
pub mod rle;

/// Delta encodings
pub mod delta_binary_packed;
pub mod delta_byte_array;
pub mod delta_length_byte_array;

/// Byte distribution
pub mod byte_stream_split;

/// Direct layouts
pub mod plain;
