//! Gzip page compression through `flate2`.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::{CompressionCodec, PageCompressor};
use crate::error::{EncodingError, Result};

fn gzip_error(e: std::io::Error) -> EncodingError {
    EncodingError::Compression {
        codec: "gzip",
        message: e.to_string(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GzipCompressor {
    level: u32,
}

impl GzipCompressor {
    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl PageCompressor for GzipCompressor {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Gzip
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(self.level));
        encoder.write_all(input).map_err(gzip_error)?;
        encoder.finish().map_err(gzip_error)
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output_buf = Vec::new();
        GzDecoder::new(input)
            .read_to_end(&mut output_buf)
            .map_err(gzip_error)?;
        Ok(output_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gzip_roundtrip() {
        let original = b"gzip gzip gzip gzip gzip gzip gzip gzip".repeat(20);
        let codec = GzipCompressor::new(6);
        let compressed = codec.compress(&original).unwrap();
        assert!(compressed.len() < original.len());
        assert_eq!(codec.decompress(&compressed).unwrap(), original);
    }

    #[test]
    fn test_gzip_bad_header_is_error() {
        let codec = GzipCompressor::new(6);
        let err = codec.decompress(b"definitely not a gzip member").unwrap_err();
        assert!(matches!(err, EncodingError::Compression { codec: "gzip", .. }));
    }
}
