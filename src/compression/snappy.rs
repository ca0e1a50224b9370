//! Snappy page compression in the raw (unframed) block format.

use super::{CompressionCodec, PageCompressor};
use crate::error::{EncodingError, Result};

fn snappy_error(e: snap::Error) -> EncodingError {
    EncodingError::Compression {
        codec: "snappy",
        message: e.to_string(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SnappyCompressor;

impl PageCompressor for SnappyCompressor {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Snappy
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        snap::raw::Encoder::new()
            .compress_vec(input)
            .map_err(snappy_error)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        snap::raw::Decoder::new()
            .decompress_vec(input)
            .map_err(snappy_error)
    }
}
