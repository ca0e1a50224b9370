// In: src/engine.rs

//! The page engine: whole-page decompression followed by value decoding, and the
//! inverse for writing.
//!
//! A `PageEngine` is built once from an `EngineConfig` and is then read-only, so
//! it can be shared across threads behind an `Arc`. Every call owns its own
//! `ByteCursor`; nothing is carried between pages.

use crate::compression::{CodecRegistry, CompressionCodec};
use crate::config::EngineConfig;
use crate::cursor::ByteCursor;
use crate::dispatch;
use crate::error::{EncodingError, Result};
use crate::types::{DecodeRequest, EncodeRequest, Encoding, PhysicalType, TypedValue};

#[derive(Debug)]
pub struct PageEngine {
    config: EngineConfig,
    registry: CodecRegistry,
}

impl PageEngine {
    /// Validates `config` and registers its codecs.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let registry = CodecRegistry::from_config(&config.compression)?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// An `EncodeRequest` carrying this engine's delta layout.
    pub fn encode_request(&self, physical_type: PhysicalType) -> EncodeRequest {
        EncodeRequest::new(physical_type).with_delta(self.config.delta)
    }

    /// Decompresses `page` with `codec`, then decodes `request.count` values.
    pub fn decode_page(
        &self,
        page: &[u8],
        codec: CompressionCodec,
        encoding: Encoding,
        request: &DecodeRequest,
    ) -> Result<Vec<TypedValue>> {
        let decompressed = self.registry.decompress(codec, page)?;
        let mut cursor = ByteCursor::new(&decompressed);
        let values = dispatch::decode_values(&mut cursor, encoding, request)?;

        let trailing = cursor.remaining();
        if trailing > 0 {
            if self.config.reject_trailing_bytes {
                return Err(EncodingError::Malformed(format!(
                    "{} trailing bytes after {} {} values",
                    trailing,
                    values.len(),
                    encoding
                )));
            }
            log::debug!("ignoring {} trailing bytes in {} page", trailing, encoding);
        }

        log_metric!(
            "event" = "decode_page",
            "codec" = codec,
            "encoding" = encoding,
            "physical_type" = request.physical_type,
            "compressed_bytes" = page.len(),
            "page_bytes" = decompressed.len(),
            "values" = values.len()
        );
        Ok(values)
    }

    /// Encodes `values` with `encoding`, then compresses the page with `codec`.
    pub fn encode_page(
        &self,
        values: &[TypedValue],
        codec: CompressionCodec,
        encoding: Encoding,
        request: &EncodeRequest,
    ) -> Result<Vec<u8>> {
        let encoded = dispatch::encode_values(values, encoding, request)?;
        let page = self.registry.compress(codec, &encoded)?;

        log_metric!(
            "event" = "encode_page",
            "codec" = codec,
            "encoding" = encoding,
            "physical_type" = request.physical_type,
            "page_bytes" = encoded.len(),
            "compressed_bytes" = page.len(),
            "values" = values.len()
        );
        Ok(page)
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
