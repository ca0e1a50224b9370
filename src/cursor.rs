//! The position-tracking view over an immutable page buffer.
//!
//! `ByteCursor` is the sole I/O primitive every codec uses. It never seeks
//! backward and every read either returns exactly the requested bytes or fails
//! with `EncodingError::Truncated`, leaving the position untouched.

use crate::error::{EncodingError, Result};

/// A forward-only reader over a borrowed byte buffer.
///
/// Invariant: `pos <= buf.len()` at all times.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// The current read offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns exactly `n` bytes and advances past them.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            return Err(EncodingError::truncated("raw bytes", n, available));
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.buf[start..self.pos])
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| EncodingError::truncated("single byte", 1, 0))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads a fixed-size array, e.g. the 4 bytes of a little-endian `i32`.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads `n` bytes and returns an independent cursor over them.
    /// The hybrid codec uses this to frame its length-delimited sub-stream.
    pub fn sub_cursor(&mut self, n: usize) -> Result<ByteCursor<'a>> {
        Ok(ByteCursor::new(self.read(n)?))
    }

    /// Consumes and returns every unread byte.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let start = self.pos;
        self.pos = self.buf.len();
        &self.buf[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_advances_and_bounds() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read(2).unwrap(), &[1, 2]);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.read_byte().unwrap(), 3);
        assert_eq!(cursor.remaining(), 2);

        let err = cursor.read(3).unwrap_err();
        assert!(matches!(
            err,
            EncodingError::Truncated {
                needed: 3,
                available: 2,
                ..
            }
        ));
        // A failed read leaves the position where it was.
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.read_array::<2>().unwrap(), [4, 5]);
        assert!(cursor.is_empty());
        assert!(cursor.read_byte().unwrap_err().is_truncated());
    }

    #[test]
    fn test_zero_length_read_on_empty_buffer() {
        let mut cursor = ByteCursor::new(&[]);
        assert_eq!(cursor.read(0).unwrap(), &[] as &[u8]);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_sub_cursor_is_independent() {
        let data = [9u8, 8, 7, 6];
        let mut cursor = ByteCursor::new(&data);
        let mut sub = cursor.sub_cursor(3).unwrap();
        assert_eq!(cursor.position(), 3);
        assert_eq!(sub.read_remaining(), &[9, 8, 7]);
        assert!(sub.is_empty());
        assert_eq!(cursor.read_remaining(), &[6]);
    }
}
