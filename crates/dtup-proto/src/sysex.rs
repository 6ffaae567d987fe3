//! SysEx-framed message carrying one slice of 7-bit payload.
//!
//! Layout on the wire:
//!
//! ```text
//! F0 43 41 7F 03 len_hi len_lo data[len] checksum F7
//!       |  |
//!       |  +-- device number (low nibble)
//!       +----- command type (high nibble)
//! ```
//!
//! The length is composed from two 7-bit bytes (`len_hi << 7 | len_lo`) and
//! the checksum covers both length bytes followed by the data.

use bytes::{BufMut, Bytes};

use crate::{
    bits::BitReader,
    checksum::message_checksum,
    errors::{FramingField, ProtocolError, Result},
};

/// Start-of-exclusive status byte
pub const SYSEX_START: u8 = 0xF0;

/// End-of-exclusive status byte
pub const SYSEX_END: u8 = 0xF7;

/// Manufacturer id (Yamaha)
pub const VENDOR_ID: u8 = 0x43;

/// Command type nibble
pub const COMMAND_TYPE: u8 = 0x4;

/// Device number nibble
pub const DEVICE_NUMBER: u8 = 0x1;

/// Model id
pub const MODEL_ID: u8 = 0x7F;

/// Constant byte ahead of the length field
pub const FIXED_BYTE: u8 = 0x03;

/// One decoded message.
///
/// Only the data field survives parsing; the framing bytes, length and
/// checksum are validated and dropped. Every data byte came from a 7-bit
/// transport field, but the high bit is not re-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysexMessage {
    data: Bytes,
}

fn expect_field(field: FramingField, expected: u8, actual: u8) -> Result<()> {
    if actual != expected {
        return Err(ProtocolError::InvalidFraming { field, expected, actual });
    }
    Ok(())
}

impl SysexMessage {
    /// Wrap an already decoded data field.
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// The 7-bit data field
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Read one message from the reader.
    ///
    /// Returns `Ok(None)` when the next byte is not `0xF0`, or when the
    /// input is exhausted exactly at a message boundary. Either means the
    /// message stream has ended. Once `0xF0` has been read, any structural
    /// or checksum problem is an error.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::InvalidFraming`] for a wrong fixed byte or nibble
    /// - [`ProtocolError::ShortRead`] if the message is cut off
    /// - [`ProtocolError::ChecksumMismatch`] if the trailer is wrong
    pub fn read(reader: &mut BitReader<'_>) -> Result<Option<Self>> {
        if reader.is_empty() {
            return Ok(None);
        }
        if reader.read_u8()? != SYSEX_START {
            return Ok(None);
        }

        expect_field(FramingField::VendorId, VENDOR_ID, reader.read_u8()?)?;
        #[allow(clippy::cast_possible_truncation)]
        {
            expect_field(FramingField::CommandType, COMMAND_TYPE, reader.read_bits(4)? as u8)?;
            expect_field(FramingField::DeviceNumber, DEVICE_NUMBER, reader.read_bits(4)? as u8)?;
        }
        expect_field(FramingField::ModelId, MODEL_ID, reader.read_u8()?)?;
        expect_field(FramingField::FixedByte, FIXED_BYTE, reader.read_u8()?)?;

        let length_bytes: [u8; 2] = reader.read_array()?;
        let length = usize::from(length_bytes[0]) << 7 | usize::from(length_bytes[1]);
        let data = reader.read_bytes(length)?;

        let expected = message_checksum(length_bytes.iter().chain(data.iter()));
        let actual = reader.read_u8()?;
        if expected != actual {
            return Err(ProtocolError::ChecksumMismatch { expected, actual });
        }

        expect_field(FramingField::Terminator, SYSEX_END, reader.read_u8()?)?;

        Ok(Some(Self { data: Bytes::copy_from_slice(&data) }))
    }

    /// Encoding a message is not supported.
    ///
    /// The 8-to-7-bit fragmentation convention of the device firmware is
    /// unknown, so no byte layout is produced.
    ///
    /// # Errors
    ///
    /// Always [`ProtocolError::NotImplemented`].
    pub fn encode(&self, _dst: &mut impl BufMut) -> Result<()> {
        Err(ProtocolError::NotImplemented("SysEx message encoding"))
    }
}
