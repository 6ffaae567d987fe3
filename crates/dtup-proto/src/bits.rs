//! Bit-granular cursor over an in-memory byte buffer.
//!
//! DTUP fields are almost all byte aligned and big endian. The exceptions are
//! the two 4-bit halves of the SysEx command byte on the read side, and the
//! 7-bit payload groups on the write side, which straddle byte boundaries.
//! Both sides keep an explicit bit offset so that either case is handled by
//! the same arithmetic.

use std::borrow::Cow;

use crate::errors::{ProtocolError, Result};

/// Read cursor over a byte slice with a bit-position offset.
///
/// Reads never block and have no side effect besides advancing the cursor.
/// A failed read leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buf: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the first bit of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, bit_pos: 0 }
    }

    /// Current byte position (rounded down when mid-byte).
    #[must_use]
    pub fn position(&self) -> usize {
        self.bit_pos / 8
    }

    /// Whole bytes consumed since the byte position `mark`.
    #[must_use]
    pub fn bytes_consumed_since(&self, mark: usize) -> usize {
        self.position().saturating_sub(mark)
    }

    /// Bits left to read.
    #[must_use]
    pub fn remaining_bits(&self) -> usize {
        (self.buf.len() * 8).saturating_sub(self.bit_pos)
    }

    /// True once every bit has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Unread bytes from the current position to the end of the buffer.
    ///
    /// Only meaningful when the cursor is byte aligned; a partially read
    /// byte is included in full.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.position().min(self.buf.len())..]
    }

    fn ensure(&self, bits: usize) -> Result<()> {
        let available = self.remaining_bits();
        if bits > available {
            return Err(ProtocolError::ShortRead { needed: bits, available });
        }
        Ok(())
    }

    fn bits_at(&self, mut pos: usize, count: u32) -> u32 {
        let mut value = 0u32;
        for _ in 0..count {
            let bit = (self.buf[pos / 8] >> (7 - pos % 8)) & 1;
            value = (value << 1) | u32::from(bit);
            pos += 1;
        }
        value
    }

    fn bytes_at(&self, pos: usize, n: usize) -> Cow<'a, [u8]> {
        if pos % 8 == 0 {
            let start = pos / 8;
            return Cow::Borrowed(&self.buf[start..start + n]);
        }
        #[allow(clippy::cast_possible_truncation)]
        let owned = (0..n).map(|i| self.bits_at(pos + i * 8, 8) as u8).collect();
        Cow::Owned(owned)
    }

    /// Read an unsigned big-endian value of `count` bits (at most 32).
    ///
    /// # Errors
    ///
    /// [`ProtocolError::ShortRead`] if fewer than `count` bits remain.
    pub fn read_bits(&mut self, count: u32) -> Result<u32> {
        debug_assert!(count <= 32, "read_bits supports at most 32 bits");
        self.ensure(count as usize)?;
        let value = self.bits_at(self.bit_pos, count);
        self.bit_pos += count as usize;
        Ok(value)
    }

    /// Return the next `n` bytes without advancing.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::ShortRead`] if fewer than `n` bytes remain.
    pub fn peek(&self, n: usize) -> Result<Cow<'a, [u8]>> {
        self.ensure(n * 8)?;
        Ok(self.bytes_at(self.bit_pos, n))
    }

    /// Read exactly `n` raw bytes.
    ///
    /// Borrows from the buffer when aligned, copies otherwise.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::ShortRead`] if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<Cow<'a, [u8]>> {
        let bytes = self.peek(n)?;
        self.bit_pos += n * 8;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::ShortRead`] if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(&bytes);
        Ok(arr)
    }

    /// Read one byte.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::ShortRead`] at end of input.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(u8::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian `u16`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::ShortRead`] if fewer than 2 bytes remain.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian `u32`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::ShortRead`] if fewer than 4 bytes remain.
    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }
}

/// Append-only bit buffer, most significant bit first.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits appended so far.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Append the low `width` bits of `value` (at most 32), high bit first.
    pub fn append_bits(&mut self, value: u32, width: u32) {
        debug_assert!(width <= 32, "append_bits supports at most 32 bits");
        for shift in (0..width).rev() {
            let bit = ((value >> shift) & 1) as u8;
            let offset = self.bit_len % 8;
            if offset == 0 {
                self.buf.push(0);
            }
            if bit == 1 {
                let last = self.buf.len() - 1;
                self.buf[last] |= 0x80 >> offset;
            }
            self.bit_len += 1;
        }
    }

    /// Finish writing, keeping only complete bytes.
    ///
    /// A trailing group of fewer than 8 bits is dropped, not padded.
    #[must_use]
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf.truncate(self.bit_len / 8);
        self.buf
    }
}
