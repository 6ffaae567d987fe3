//! Error types for DTUP decoding.
//!
//! Every error is terminal for the file being decoded. The one non-error
//! control signal, "no further message starts here", is expressed as
//! `Ok(None)` by [`SysexMessage::read`](crate::SysexMessage::read) and never
//! appears in this enum.

use std::fmt;

use thiserror::Error;

/// Fixed SysEx framing fields that are checked while reading a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramingField {
    /// Manufacturer byte following `0xF0`
    VendorId,
    /// High nibble of the command byte
    CommandType,
    /// Low nibble of the command byte
    DeviceNumber,
    /// Model byte
    ModelId,
    /// Constant byte preceding the length field
    FixedByte,
    /// End-of-exclusive byte `0xF7`
    Terminator,
}

impl fmt::Display for FramingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VendorId => "vendor_id",
            Self::CommandType => "command_type",
            Self::DeviceNumber => "device_number",
            Self::ModelId => "model_id",
            Self::FixedByte => "fixed_byte",
            Self::Terminator => "sysex_end",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while decoding a DTUP file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Input ended before a field could be read
    #[error("short read: needed {needed} bits, only {available} available")]
    ShortRead {
        /// Bits the field required
        needed: usize,
        /// Bits left in the buffer
        available: usize,
    },

    /// Container or header magic did not match
    #[error("invalid magic: expected {:?}, got {:?}", Ascii(expected), Ascii(actual))]
    InvalidMagic {
        /// Magic the reader was looking for
        expected: [u8; 4],
        /// Bytes found in its place
        actual: [u8; 4],
    },

    /// A fixed SysEx framing byte or nibble had the wrong value
    #[error("invalid {field}: expected {expected:#04x}, got {actual:#04x}")]
    InvalidFraming {
        /// Which framing field failed
        field: FramingField,
        /// Required value
        expected: u8,
        /// Value found in the stream
        actual: u8,
    },

    /// Message checksum trailer disagrees with the computed checksum
    #[error("checksum mismatch: computed {expected:#04x}, trailer {actual:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over length and data
        expected: u8,
        /// Checksum byte carried by the message
        actual: u8,
    },

    /// SPRC header CRC disagrees with the CRC of the bytes after it
    #[error("SPRC header CRC mismatch: header says {expected:#06x}, content is {actual:#06x}")]
    HeaderCrcMismatch {
        /// CRC stored in the header
        expected: u16,
        /// CRC16/GENIBUS of the content
        actual: u16,
    },

    /// The requested operation has no defined byte layout
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Convenient Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Renders magic bytes as text when printable, hex otherwise.
struct Ascii<'a>(&'a [u8; 4]);

impl fmt::Debug for Ascii<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(u8::is_ascii_graphic) {
            write!(f, "\"{}\"", String::from_utf8_lossy(self.0))
        } else {
            write!(f, "{:02x?}", self.0)
        }
    }
}
