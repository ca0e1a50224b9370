//! Whole-page compression that runs before value decoding and after value encoding.
//!
//! Codecs are looked up in an explicit `CodecRegistry` that the caller builds once
//! from an `EngineConfig`. Each codec beyond `Uncompressed` sits behind a Cargo
//! feature; asking for one that is not registered is `CodecUnavailable`.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CompressionConfig;
use crate::error::{EncodingError, Result};

#[cfg(feature = "gzip")]
mod gzip;
#[cfg(feature = "snappy")]
mod snappy;
#[cfg(feature = "zstd")]
mod zstd;

#[cfg(feature = "gzip")]
pub use gzip::GzipCompressor;
#[cfg(feature = "snappy")]
pub use snappy::SnappyCompressor;
#[cfg(feature = "zstd")]
pub use zstd::ZstdCompressor;

//==================================================================================
// 1. Codec Identifiers
//==================================================================================

/// Page compression codecs, numbered as in the column chunk metadata.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CompressionCodec {
    Uncompressed,
    Snappy,
    Gzip,
    Zstd,
}

impl CompressionCodec {
    pub const ALL: [CompressionCodec; 4] = [
        CompressionCodec::Uncompressed,
        CompressionCodec::Snappy,
        CompressionCodec::Gzip,
        CompressionCodec::Zstd,
    ];

    pub fn from_thrift_id(id: i32) -> Result<Self> {
        match id {
            0 => Ok(CompressionCodec::Uncompressed),
            1 => Ok(CompressionCodec::Snappy),
            2 => Ok(CompressionCodec::Gzip),
            6 => Ok(CompressionCodec::Zstd),
            other => Err(EncodingError::CodecUnavailable(format!(
                "compression codec id {}",
                other
            ))),
        }
    }

    pub fn thrift_id(&self) -> i32 {
        match self {
            CompressionCodec::Uncompressed => 0,
            CompressionCodec::Snappy => 1,
            CompressionCodec::Gzip => 2,
            CompressionCodec::Zstd => 6,
        }
    }

    /// Whether this build carries an implementation of the codec.
    pub fn is_compiled_in(&self) -> bool {
        match self {
            CompressionCodec::Uncompressed => true,
            CompressionCodec::Snappy => cfg!(feature = "snappy"),
            CompressionCodec::Gzip => cfg!(feature = "gzip"),
            CompressionCodec::Zstd => cfg!(feature = "zstd"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompressionCodec::Uncompressed => "uncompressed",
            CompressionCodec::Snappy => "snappy",
            CompressionCodec::Gzip => "gzip",
            CompressionCodec::Zstd => "zstd",
        }
    }
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//==================================================================================
// 2. The Compressor Seam
//==================================================================================

/// One whole-buffer compression codec.
pub trait PageCompressor: Send + Sync {
    fn codec(&self) -> CompressionCodec;
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>>;
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>>;
}

/// Pages stored without compression pass through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl PageCompressor for Passthrough {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Uncompressed
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}

//==================================================================================
// 3. The Registry
//==================================================================================

/// Maps codec identifiers to their implementations. Built once, then read-only.
pub struct CodecRegistry {
    codecs: HashMap<CompressionCodec, Box<dyn PageCompressor>>,
}

impl CodecRegistry {
    /// A registry holding only the passthrough codec.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(Passthrough));
        registry
    }

    /// A registry holding nothing at all.
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Registers every codec the configuration enables.
    pub fn from_config(config: &CompressionConfig) -> Result<Self> {
        let mut registry = Self::new();
        for codec in &config.enabled_codecs {
            match codec {
                CompressionCodec::Uncompressed => {}
                #[cfg(feature = "snappy")]
                CompressionCodec::Snappy => registry.register(Box::new(SnappyCompressor)),
                #[cfg(feature = "gzip")]
                CompressionCodec::Gzip => {
                    registry.register(Box::new(GzipCompressor::new(config.gzip_level)))
                }
                #[cfg(feature = "zstd")]
                CompressionCodec::Zstd => {
                    registry.register(Box::new(ZstdCompressor::new(config.zstd_level)))
                }
                #[allow(unreachable_patterns)]
                other => {
                    return Err(EncodingError::CodecUnavailable(format!(
                        "{} is not compiled into this build",
                        other
                    )))
                }
            }
        }
        log::debug!(
            "codec registry: {:?}",
            registry.codecs.keys().collect::<Vec<_>>()
        );
        Ok(registry)
    }

    /// Adds or replaces the implementation for `compressor.codec()`.
    pub fn register(&mut self, compressor: Box<dyn PageCompressor>) {
        self.codecs.insert(compressor.codec(), compressor);
    }

    pub fn contains(&self, codec: CompressionCodec) -> bool {
        self.codecs.contains_key(&codec)
    }

    pub fn get(&self, codec: CompressionCodec) -> Result<&dyn PageCompressor> {
        self.codecs
            .get(&codec)
            .map(|c| c.as_ref())
            .ok_or_else(|| EncodingError::CodecUnavailable(format!("{} is not registered", codec)))
    }

    pub fn compress(&self, codec: CompressionCodec, input: &[u8]) -> Result<Vec<u8>> {
        self.get(codec)?.compress(input)
    }

    pub fn decompress(&self, codec: CompressionCodec, input: &[u8]) -> Result<Vec<u8>> {
        self.get(codec)?.decompress(input)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("codecs", &self.codecs.keys().collect::<Vec<_>>())
            .finish()
    }
}

//==================================================================================
// 4. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> Vec<u8> {
        (0..4096u32).flat_map(|i| (i % 251).to_le_bytes()).collect()
    }

    #[test]
    fn test_thrift_ids() {
        for codec in CompressionCodec::ALL {
            assert_eq!(CompressionCodec::from_thrift_id(codec.thrift_id()).unwrap(), codec);
        }
        assert!(matches!(
            CompressionCodec::from_thrift_id(3),
            Err(EncodingError::CodecUnavailable(_))
        ));
    }

    #[test]
    fn test_every_enabled_codec_roundtrips() {
        let registry = CodecRegistry::from_config(&CompressionConfig::default()).unwrap();
        let page = sample_page();
        for codec in CompressionCodec::ALL.iter().filter(|c| c.is_compiled_in()) {
            assert!(registry.contains(*codec));
            let compressed = registry.compress(*codec, &page).unwrap();
            let restored = registry.decompress(*codec, &compressed).unwrap();
            assert_eq!(restored, page, "codec {}", codec);
        }
    }

    #[test]
    fn test_unregistered_codec_is_unavailable() {
        let config = CompressionConfig {
            enabled_codecs: vec![],
            ..CompressionConfig::default()
        };
        let registry = CodecRegistry::from_config(&config).unwrap();
        assert!(registry.contains(CompressionCodec::Uncompressed));
        assert!(matches!(
            registry.decompress(CompressionCodec::Zstd, b"abc"),
            Err(EncodingError::CodecUnavailable(_))
        ));
        assert!(CodecRegistry::empty().get(CompressionCodec::Uncompressed).is_err());
    }

    #[test]
    fn test_passthrough_is_identity() {
        let registry = CodecRegistry::new();
        let page = b"plain bytes".to_vec();
        assert_eq!(registry.compress(CompressionCodec::Uncompressed, &page).unwrap(), page);
    }
}
