//! Optional SPRC integrity header.
//!
//! Some DTUP files start with a fixed 16-byte SPRC preamble carrying a
//! CRC16/GENIBUS of everything that follows it. When present, the container
//! behind it is only trusted once that CRC has been validated.

use std::fmt;

use bytes::BufMut;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::{
    bits::BitReader,
    checksum::crc16_genibus,
    errors::{ProtocolError, Result},
};

/// Fixed 16-byte SPRC header (Big Endian).
///
/// ```text
///  0..4   magic "SPRC"
///  4..6   revision
///  6..8   CRC16/GENIBUS of bytes 16..EOF
///  8      force flag
///  9..16  unknown, preserved verbatim
/// ```
///
/// Fields are stored as raw byte arrays so that any 16-byte pattern can be
/// cast to this struct without alignment concerns.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct SprcHeader {
    magic: [u8; 4],
    revision: [u8; 2],
    crc_value: [u8; 2],
    force_flag: u8,
    unknown: [u8; 7],
}

impl SprcHeader {
    /// Size of the serialized header (16 bytes)
    pub const SIZE: usize = 16;

    /// Magic bytes: "SPRC"
    pub const MAGIC: [u8; 4] = *b"SPRC";

    /// Build a header whose CRC covers `body`, the bytes that will follow it.
    #[must_use]
    pub fn new(revision: u16, force_flag: u8, unknown: [u8; 7], body: &[u8]) -> Self {
        Self {
            magic: Self::MAGIC,
            revision: revision.to_be_bytes(),
            crc_value: crc16_genibus(body).to_be_bytes(),
            force_flag,
            unknown,
        }
    }

    /// Check whether the reader is positioned at an SPRC header.
    ///
    /// Never consumes input. Fewer than [`Self::SIZE`] remaining bytes or a
    /// magic mismatch both mean "no header", not an error.
    #[must_use]
    pub fn detect(reader: &BitReader<'_>) -> bool {
        reader.peek(Self::SIZE).is_ok_and(|bytes| bytes[..4] == Self::MAGIC)
    }

    /// Cast the first 16 bytes of `bytes` to a header (zero-copy).
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::ShortRead`] if `bytes` is shorter than 16 bytes
    /// - [`ProtocolError::InvalidMagic`] if the magic is not "SPRC"
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| ProtocolError::ShortRead {
                needed: Self::SIZE * 8,
                available: bytes.len() * 8,
            })?
            .0;

        if header.magic != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic { expected: Self::MAGIC, actual: header.magic });
        }

        Ok(header)
    }

    /// Consume exactly 16 bytes from the reader and parse them.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_bytes`]. The reader is not advanced on failure.
    pub fn read(reader: &mut BitReader<'_>) -> Result<Self> {
        let header = *Self::from_bytes(&reader.peek(Self::SIZE)?)?;
        reader.read_bytes(Self::SIZE)?;
        Ok(header)
    }

    /// True iff the CRC16/GENIBUS of `remaining` equals the stored CRC.
    ///
    /// `remaining` must be the raw file content after the header, untouched
    /// by any parsing.
    #[must_use]
    pub fn validate(&self, remaining: &[u8]) -> bool {
        crc16_genibus(remaining) == self.crc_value()
    }

    /// Serialize header to bytes
    #[must_use]
    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(IntoBytes::as_bytes(self));
        arr
    }

    /// Write the header into `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(IntoBytes::as_bytes(self));
    }

    /// Header revision
    #[must_use]
    pub fn revision(&self) -> u16 {
        u16::from_be_bytes(self.revision)
    }

    /// Expected CRC of the content following the header
    #[must_use]
    pub fn crc_value(&self) -> u16 {
        u16::from_be_bytes(self.crc_value)
    }

    /// Force flag byte
    #[must_use]
    pub fn force_flag(&self) -> u8 {
        self.force_flag
    }

    /// Trailing bytes whose meaning is unknown
    #[must_use]
    pub fn unknown(&self) -> &[u8; 7] {
        &self.unknown
    }
}

impl fmt::Debug for SprcHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SprcHeader")
            .field("revision", &self.revision())
            .field("crc_value", &format!("{:#06x}", self.crc_value()))
            .field("force_flag", &self.force_flag())
            .field("unknown", &format!("{:02x?}", self.unknown))
            .finish()
    }
}
