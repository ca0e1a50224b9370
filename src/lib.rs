//! This file is the root of the `pagecodec` Rust crate.
//!
//! `pagecodec` decodes and encodes the values stored in the data pages of a
//! columnar file: plain values, the RLE/bit-packed hybrid, the delta encodings
//! and byte-stream-split. Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`kernels`, `dispatch`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types a caller needs to drive the engine.
//!
//! ```
//! use pagecodec::{ByteCursor, DecodeRequest, Encoding, PhysicalType, TypedValue};
//!
//! // A length-prefixed hybrid region holding one RLE run of three 5s.
//! let page = [0x02, 0x00, 0x00, 0x00, 0x06, 0x05];
//! let request = DecodeRequest::new(PhysicalType::Int32, 3).with_bit_width(8);
//! let mut cursor = ByteCursor::new(&page);
//! let values = pagecodec::decode_values(&mut cursor, Encoding::Rle, &request).unwrap();
//! assert_eq!(values, vec![TypedValue::Int32(5); 3]);
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod compression;
pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod kernels;
pub mod types;

mod traits;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use compression::{CodecRegistry, CompressionCodec, PageCompressor};
pub use config::{CompressionConfig, DeltaConfig, EngineConfig};
pub use cursor::ByteCursor;
pub use dispatch::{decode_values, encode_values, read_plain, write_plain};
pub use engine::PageEngine;
pub use error::{EncodingError, Result};
pub use observability::init_logging;
pub use traits::LeBytes;
pub use types::{DecodeRequest, EncodeRequest, Encoding, PhysicalType, TypedValue};
