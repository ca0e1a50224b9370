//! Per-column metadata handed to the dispatcher for one decode or encode call.

use crate::config::DeltaConfig;
use crate::error::{EncodingError, Result};

use super::PhysicalType;

/// What the caller knows about a page before decoding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRequest {
    pub physical_type: PhysicalType,
    /// The number of values the caller needs from the page.
    pub count: usize,
    /// Bit width for the hybrid codec (levels, 32-bit RLE pages).
    pub bit_width: Option<u8>,
    /// Byte length of each `FIXED_LEN_BYTE_ARRAY` value.
    pub fixed_length: Option<usize>,
}

impl DecodeRequest {
    pub fn new(physical_type: PhysicalType, count: usize) -> Self {
        Self {
            physical_type,
            count,
            bit_width: None,
            fixed_length: None,
        }
    }

    pub fn with_bit_width(mut self, bit_width: u8) -> Self {
        self.bit_width = Some(bit_width);
        self
    }

    pub fn with_fixed_length(mut self, fixed_length: usize) -> Self {
        self.fixed_length = Some(fixed_length);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_shape(self.physical_type, self.bit_width, self.fixed_length)
    }

    /// The fixed length, which `FIXED_LEN_BYTE_ARRAY` requests must carry.
    pub(crate) fn require_fixed_length(&self) -> Result<usize> {
        require_fixed_length(self.physical_type, self.fixed_length)
    }
}

/// What the encoder needs besides the values themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    pub physical_type: PhysicalType,
    pub bit_width: Option<u8>,
    pub fixed_length: Option<usize>,
    /// Block layout used by the delta encoders.
    pub delta: DeltaConfig,
}

impl EncodeRequest {
    pub fn new(physical_type: PhysicalType) -> Self {
        Self {
            physical_type,
            bit_width: None,
            fixed_length: None,
            delta: DeltaConfig::default(),
        }
    }

    pub fn with_bit_width(mut self, bit_width: u8) -> Self {
        self.bit_width = Some(bit_width);
        self
    }

    pub fn with_fixed_length(mut self, fixed_length: usize) -> Self {
        self.fixed_length = Some(fixed_length);
        self
    }

    pub fn with_delta(mut self, delta: DeltaConfig) -> Self {
        self.delta = delta;
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_shape(self.physical_type, self.bit_width, self.fixed_length)
    }

    pub(crate) fn require_fixed_length(&self) -> Result<usize> {
        require_fixed_length(self.physical_type, self.fixed_length)
    }
}

fn validate_shape(
    physical_type: PhysicalType,
    bit_width: Option<u8>,
    fixed_length: Option<usize>,
) -> Result<()> {
    if let Some(width) = bit_width {
        if width > 64 {
            return Err(EncodingError::InvalidRequest(format!(
                "bit width {} is outside [0, 64]",
                width
            )));
        }
    }
    if fixed_length == Some(0) {
        return Err(EncodingError::InvalidRequest(
            "fixed length must be greater than zero".to_string(),
        ));
    }
    if physical_type == PhysicalType::FixedLenByteArray && fixed_length.is_none() {
        return Err(EncodingError::InvalidRequest(
            "FIXED_LEN_BYTE_ARRAY requires a fixed length".to_string(),
        ));
    }
    Ok(())
}

fn require_fixed_length(physical_type: PhysicalType, fixed_length: Option<usize>) -> Result<usize> {
    match fixed_length {
        Some(len) if len > 0 => Ok(len),
        _ => Err(EncodingError::InvalidRequest(format!(
            "{} requires a positive fixed length",
            physical_type
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bit_width_range() {
        assert!(DecodeRequest::new(PhysicalType::Int32, 4)
            .with_bit_width(64)
            .validate()
            .is_ok());
        assert!(matches!(
            DecodeRequest::new(PhysicalType::Int32, 4)
                .with_bit_width(65)
                .validate(),
            Err(EncodingError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_fixed_len_requires_positive_length() {
        let req = DecodeRequest::new(PhysicalType::FixedLenByteArray, 1);
        assert!(req.validate().is_err());
        assert!(req.clone().with_fixed_length(0).validate().is_err());
        assert_eq!(req.with_fixed_length(16).require_fixed_length().unwrap(), 16);
    }
}
