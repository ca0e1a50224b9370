//! The bit-level cursor behind every bit-packed read.
//!
//! Values are stored least-significant-bit first: the first value occupies the
//! low bits of the first byte and spills into the next byte's low bits when it
//! crosses a byte boundary. Keeping the `byte_offset`/`bit_offset` pair in one
//! small type means the packing kernels never touch shift arithmetic directly.

/// LSB-first reader over a borrowed bit-packed region.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    byte_offset: usize,
    /// Bits of `bytes[byte_offset]` already consumed, always in `0..8`.
    bit_offset: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            byte_offset: 0,
            bit_offset: 0,
        }
    }

    pub fn bits_remaining(&self) -> usize {
        (self.bytes.len() - self.byte_offset) * 8 - self.bit_offset as usize
    }

    /// Reads the next `bits` bits (at most 64) as an unsigned value.
    ///
    /// Returns `None` without moving if fewer bits remain or `bits > 64`.
    pub fn take(&mut self, bits: u8) -> Option<u64> {
        if bits > 64 || bits as usize > self.bits_remaining() {
            return None;
        }

        let mut value = 0u64;
        let mut filled = 0u8;
        while filled < bits {
            let byte = self.bytes[self.byte_offset];
            let available = 8 - self.bit_offset;
            let chunk = available.min(bits - filled);
            let mask = ((1u16 << chunk) - 1) as u8;
            let piece = (byte >> self.bit_offset) & mask;

            value |= (piece as u64) << filled;
            filled += chunk;
            self.bit_offset += chunk;
            if self.bit_offset == 8 {
                self.bit_offset = 0;
                self.byte_offset += 1;
            }
        }
        Some(value)
    }

    /// Skips `bits` bits. Returns `false` without moving if they are not there.
    pub fn advance(&mut self, bits: usize) -> bool {
        if bits > self.bits_remaining() {
            return false;
        }
        let absolute = self.byte_offset * 8 + self.bit_offset as usize + bits;
        self.byte_offset = absolute / 8;
        self.bit_offset = (absolute % 8) as u8;
        true
    }
}
