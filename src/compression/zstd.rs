//! Zstandard page compression: one raw zstd frame per page.
//!
//! A safe, panic-free wrapper around the `zstd` crate's streaming encoder and
//! decoder.

use std::io::Write;

use ::zstd::stream::{Decoder, Encoder};

use super::{CompressionCodec, PageCompressor};
use crate::error::{EncodingError, Result};

fn zstd_error(e: impl ToString) -> EncodingError {
    EncodingError::Compression {
        codec: "zstd",
        message: e.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl PageCompressor for ZstdCompressor {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Zstd
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output_buf = Vec::with_capacity(input.len() / 2 + 64);
        let mut encoder = Encoder::new(&mut output_buf, self.level).map_err(zstd_error)?;
        encoder.write_all(input).map_err(zstd_error)?;
        // `finish` is essential to finalize the frame.
        encoder.finish().map_err(zstd_error)?;
        Ok(output_buf)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }
        let mut output_buf = Vec::new();
        let mut decoder = Decoder::new(input).map_err(zstd_error)?;
        std::io::copy(&mut decoder, &mut output_buf).map_err(zstd_error)?;
        Ok(output_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zstd_roundtrip() {
        let original: Vec<u8> = (0..1000).map(|i| (i % 256) as u8).collect();
        let codec = ZstdCompressor::new(3);
        let compressed = codec.compress(&original).unwrap();
        assert!(compressed.len() < original.len());
        assert_eq!(codec.decompress(&compressed).unwrap(), original);
    }

    #[test]
    fn test_zstd_empty_input() {
        let codec = ZstdCompressor::new(3);
        let compressed = codec.compress(&[]).unwrap();
        assert!(codec.decompress(&compressed).unwrap().is_empty());
        assert!(codec.decompress(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_zstd_corrupt_frame_is_error() {
        let codec = ZstdCompressor::new(3);
        let err = codec.decompress(&[1, 2, 3, 4, 5]).unwrap_err();
        assert!(matches!(err, EncodingError::Compression { codec: "zstd", .. }));
    }
}
