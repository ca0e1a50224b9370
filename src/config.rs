// In: src/config.rs

//! The single source of truth for all engine configuration.
//!
//! `EngineConfig` is created once at the application boundary (from a JSON
//! document or in code) and then shared, read-only, by the `PageEngine`.
//! It decides which compression codecs are registered and how the delta
//! encoders lay out their blocks.

use serde::{Deserialize, Serialize};

use crate::compression::CompressionCodec;
use crate::error::{EncodingError, Result};

//==================================================================================
// I. Section Structs
//==================================================================================

/// Settings for the whole-buffer compression step that runs before decoding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CompressionConfig {
    /// The codecs registered at startup. `Uncompressed` is always available.
    #[serde(default = "default_enabled_codecs")]
    pub enabled_codecs: Vec<CompressionCodec>,

    #[serde(default = "default_zstd_level")]
    pub zstd_level: i32,

    #[serde(default = "default_gzip_level")]
    pub gzip_level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled_codecs: default_enabled_codecs(),
            zstd_level: default_zstd_level(),
            gzip_level: default_gzip_level(),
        }
    }
}

/// Block layout for the delta-binary-packed encoder.
///
/// Decoders accept whatever layout the page header declares; these values only
/// shape what this crate writes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DeltaConfig {
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    #[serde(default = "default_miniblocks_per_block")]
    pub miniblocks_per_block: usize,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            miniblocks_per_block: default_miniblocks_per_block(),
        }
    }
}

impl DeltaConfig {
    /// Values per mini-block, if the layout divides evenly.
    pub fn values_per_miniblock(&self) -> Option<usize> {
        if self.miniblocks_per_block == 0 || self.block_size % self.miniblocks_per_block != 0 {
            return None;
        }
        Some(self.block_size / self.miniblocks_per_block)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 || self.block_size % 128 != 0 {
            return Err(EncodingError::Config(format!(
                "delta block_size must be a positive multiple of 128, got {}",
                self.block_size
            )));
        }
        match self.values_per_miniblock() {
            Some(per) if per % 32 == 0 => Ok(()),
            _ => Err(EncodingError::Config(format!(
                "delta block_size {} must split into {} mini-blocks of a multiple of 32 values",
                self.block_size, self.miniblocks_per_block
            ))),
        }
    }
}

//==================================================================================
// II. The Unified EngineConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    #[serde(default)]
    pub compression: CompressionConfig,

    #[serde(default)]
    pub delta: DeltaConfig,

    /// If true, `PageEngine::decode_page` fails when the decoded values do not
    /// consume the whole decompressed page.
    #[serde(default)]
    pub reject_trailing_bytes: bool,
}

// Default implementation to make constructing the config easier.
impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            compression: CompressionConfig::default(),
            delta: DeltaConfig::default(),
            reject_trailing_bytes: false,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let level = self.compression.zstd_level;
        if !(1..=22).contains(&level) {
            return Err(EncodingError::Config(format!(
                "zstd_level must be within 1..=22, got {}",
                level
            )));
        }
        if self.compression.gzip_level > 9 {
            return Err(EncodingError::Config(format!(
                "gzip_level must be within 0..=9, got {}",
                self.compression.gzip_level
            )));
        }
        for codec in &self.compression.enabled_codecs {
            if !codec.is_compiled_in() {
                return Err(EncodingError::Config(format!(
                    "codec {} is enabled but its cargo feature is not compiled in",
                    codec
                )));
            }
        }
        self.delta.validate()
    }
}

/// Every codec this build was compiled with.
fn default_enabled_codecs() -> Vec<CompressionCodec> {
    CompressionCodec::ALL
        .iter()
        .copied()
        .filter(CompressionCodec::is_compiled_in)
        .collect()
}

fn default_zstd_level() -> i32 {
    3
}

fn default_gzip_level() -> u32 {
    6
}

fn default_block_size() -> usize {
    128
}

fn default_miniblocks_per_block() -> usize {
    4
}
