// In: src/error.rs

//! This module defines the single, unified error type for the entire pagecodec library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every codec returns `Result<_, EncodingError>`. A failed decode never hands back
//! a partially populated value sequence.

use thiserror::Error;

use crate::types::{Encoding, PhysicalType};

#[derive(Error, Debug)]
pub enum EncodingError {
    // =========================================================================
    // === Decoding Errors (untrusted page bytes)
    // =========================================================================
    /// Fewer bytes (or values) were available than the format requires.
    #[error("Truncated input while reading {context}: needed {needed}, only {available} available")]
    Truncated {
        context: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Invalid physical type: {0}")]
    InvalidType(String),

    /// An internally inconsistent header or stream.
    #[error("Malformed encoded data: {0}")]
    Malformed(String),

    #[error("Invalid decode/encode request: {0}")]
    InvalidRequest(String),

    #[error("Encoding {encoding} is not supported for physical type {physical_type}")]
    UnsupportedEncoding {
        encoding: Encoding,
        physical_type: PhysicalType,
    },

    // =========================================================================
    // === Encoding Errors (caller-supplied values)
    // =========================================================================
    #[error("Invalid input value: {0}")]
    InvalidValue(String),

    #[error("Bitpack encoding error: value {0} exceeds bit width {1}")]
    BitpackEncodeError(u64, u8),

    // =========================================================================
    // === Compression Framing & Configuration
    // =========================================================================
    #[error("Compression codec unavailable: {0}")]
    CodecUnavailable(String),

    #[error("{codec} operation failed: {message}")]
    Compression {
        codec: &'static str,
        message: String,
    },

    #[error("Invalid engine configuration: {0}")]
    Config(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error from the Serde JSON library, typically while loading an `EngineConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncodingError {
    /// Shorthand used by every codec that runs out of input.
    pub(crate) fn truncated(context: &'static str, needed: usize, available: usize) -> Self {
        EncodingError::Truncated {
            context,
            needed,
            available,
        }
    }

    /// Returns `true` if this is a `Truncated` failure.
    pub fn is_truncated(&self) -> bool {
        matches!(self, EncodingError::Truncated { .. })
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EncodingError>;
